//! Slotwatch
//!
//! A personal desktop bot that watches a test-booking page for an earlier
//! appointment slot.
//!
//! # How it works
//! - The operator drags out two screen regions at startup: the page's
//!   refresh button and the result text area
//! - A background loop clicks the button, lets the page settle, captures
//!   the result area, and runs OCR on it
//! - A date in a preferred month (or an unreadable page) raises an audible
//!   alarm and a push notification
//! - A small always-on-top panel shows the live log and exposes
//!   Stop Alarm / Wake Up / End Program

pub mod alarm;
pub mod capture;
pub mod core;
pub mod input;
pub mod monitor;
pub mod notify;
pub mod ocr;
pub mod sound;
pub mod window;

pub use crate::core::config::Config;
pub use crate::core::context::AppContext;
pub use crate::core::log::{LogChannel, LogEntry};
pub use crate::core::region::{Region, SelectedRegions};
pub use crate::core::signal::{Signal, SignalSet};
pub use alarm::AlarmController;
pub use monitor::Classification;
pub use notify::Notifier;
