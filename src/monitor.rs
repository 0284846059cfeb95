//! The polling loop
//!
//! A single long-lived background thread: click the watched button, wait for
//! the page to settle, capture and recognize the message region, classify
//! the text, react, then sleep a jittered interval. Only the program-stop
//! signal ends the loop; a failed iteration logs, alarms, and retries after
//! a bounded backoff.

use crate::alarm::AlarmController;
use crate::capture::{CaptureError, RegionCapture, ScreenshotTool};
use crate::core::config::WatchConfig;
use crate::core::context::AppContext;
use crate::core::region::SelectedRegions;
use crate::input::{EnigoDriver, PointerDriver, PointerError};
use crate::notify::Notifier;
use crate::ocr::{OcrError, Recognizer, TesseractRecognizer};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use rand::rngs::ThreadRng;
use rand::Rng;
use regex::Regex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

static DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-]\d{4}\b").unwrap());

/// Pause after hiding the panel so the window system applies it before the click.
const SURFACE_HIDE_GRACE: Duration = Duration::from_millis(250);

/// Control surface visibility, as seen from the polling loop. The panel is
/// hidden around the click so it cannot occlude the watched regions.
pub trait SurfaceControl {
    fn hide(&self);
    fn show(&self);
}

/// Why a cycle could not produce a classification.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Pointer(#[from] PointerError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Recognize(#[from] OcrError),
    #[error("matched a date pattern but could not parse {0:?} as day/month/year")]
    DateParse(String),
    #[error("button region has no clickable interior")]
    UnusableRegion,
}

/// What the recognized text turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A date in one of the months the operator wants to hear about.
    PreferredDate { date: NaiveDate, text: String },
    /// A date, but not in a preferred month.
    OtherDate { date: NaiveDate, text: String },
    /// The expected "nothing available" page.
    SteadyState,
    /// Text matching neither a date nor the steady-state phrase.
    Anomaly,
}

/// Classify recognized text against the date pattern and steady-state phrase.
pub fn classify(text: &str, watch: &WatchConfig) -> Result<Classification, CycleError> {
    if let Some(found) = DATE_REGEX.find(text) {
        let date_str = found.as_str().replace('-', "/");
        let date = NaiveDate::parse_from_str(&date_str, "%d/%m/%Y")
            .map_err(|_| CycleError::DateParse(date_str.clone()))?;
        if watch.preferred_months.contains(&date.month()) {
            return Ok(Classification::PreferredDate {
                date,
                text: date_str,
            });
        }
        return Ok(Classification::OtherDate {
            date,
            text: date_str,
        });
    }

    if text
        .to_lowercase()
        .contains(&watch.steady_phrase.to_lowercase())
    {
        return Ok(Classification::SteadyState);
    }

    Ok(Classification::Anomaly)
}

/// The polling loop and its collaborators.
pub struct Monitor<P, C, R, S> {
    ctx: Arc<AppContext>,
    regions: SelectedRegions,
    alarm: Arc<AlarmController>,
    notifier: Notifier,
    pointer: P,
    capture: C,
    recognizer: R,
    surface: S,
    rng: ThreadRng,
}

impl<P, C, R, S> Monitor<P, C, R, S>
where
    P: PointerDriver,
    C: RegionCapture,
    R: Recognizer,
    S: SurfaceControl,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ctx: Arc<AppContext>,
        regions: SelectedRegions,
        alarm: Arc<AlarmController>,
        notifier: Notifier,
        pointer: P,
        capture: C,
        recognizer: R,
        surface: S,
    ) -> Self {
        Self {
            ctx,
            regions,
            alarm,
            notifier,
            pointer,
            capture,
            recognizer,
            surface,
            rng: rand::thread_rng(),
        }
    }

    /// Run until the program-stop signal is raised. Never panics out of an
    /// iteration; failures alarm and back off, then the loop continues.
    pub fn run(mut self) {
        info!("Monitoring loop started");
        let mut cycle: u64 = 0;

        while !self.ctx.signals.program_stop.is_set() {
            cycle += 1;
            match self.run_cycle(cycle) {
                Ok(classification) => {
                    self.react(&classification);
                    let delay = self.jittered_delay();
                    info!("Sleeping {:.1}s", delay.as_secs_f64());
                    self.ctx
                        .log
                        .post(format!("⏳ Sleeping {:.1}s", delay.as_secs_f64()));
                    self.interruptible_sleep(delay);
                }
                Err(err) => {
                    // A failure mid-cycle may have left the panel hidden
                    self.surface.show();
                    warn!("Cycle {cycle} failed: {err}");
                    self.ctx.log.post(format!("⚠️ Error: {err}"));
                    self.alarm.start();
                    let backoff = self.ctx.config.timing.failure_backoff();
                    self.interruptible_sleep(backoff);
                }
            }
        }

        info!("Monitoring loop stopped");
    }

    /// One full cycle: click, settle, capture, recognize, classify.
    fn run_cycle(&mut self, cycle: u64) -> Result<Classification, CycleError> {
        info!("Cycle {cycle}");
        self.ctx.log.post(format!("Cycle {cycle}"));

        let origin = self.pointer.cursor_position()?;

        let inset = self.ctx.config.click.inset_px;
        let (click_x, click_y) = self
            .regions
            .button
            .random_point_inside(inset, &mut self.rng)
            .ok_or(CycleError::UnusableRegion)?;

        self.surface.hide();
        thread::sleep(SURFACE_HIDE_GRACE);

        let glide = self.random_millis(
            self.ctx.config.click.glide_min_ms,
            self.ctx.config.click.glide_max_ms,
        );
        self.pointer.move_to(click_x, click_y, glide)?;
        self.pointer.click(click_x, click_y)?;
        self.surface.show();
        self.ctx.log.post("Clicked button at marked position");

        let restore = self.random_millis(
            self.ctx.config.click.restore_min_ms,
            self.ctx.config.click.restore_max_ms,
        );
        self.pointer.move_to(origin.0, origin.1, restore)?;

        thread::sleep(self.ctx.config.timing.settle_wait());

        let image = self.capture.capture(&self.regions.message)?;
        let text = self.recognizer.recognize(&image)?;
        info!("Recognized text: {}", text.trim());
        self.ctx.log.post(text.trim().to_string());

        classify(&text, &self.ctx.config.watch)
    }

    fn react(&self, classification: &Classification) {
        match classification {
            Classification::PreferredDate { text, .. } => {
                info!("Found preferred month: {text}");
                self.ctx
                    .log
                    .post(format!("🎉 Found preferred month: {text}"));
                self.notifier
                    .send(format!("🚗 Found preferred month: {text}"));
                self.alarm.start();
            }
            Classification::OtherDate { text, .. } => {
                info!("Found date but not preferred month: {text}");
                self.ctx
                    .log
                    .post(format!("Found date but not preferred month: {text}"));
                self.notifier
                    .send(format!("🚗 Found date but not preferred month: {text}"));
            }
            Classification::SteadyState => {}
            Classification::Anomaly => {
                warn!("Unrecognized page text, manual controls needed");
                self.ctx.log.post("⚠️ Error: Manual controls needed");
                self.notifier.send("⚠️ Error: Manual controls needed");
                self.alarm.start();
            }
        }
    }

    /// Sleep up to `duration`, returning early the moment the wake signal is
    /// raised. Wake is cleared first so a stale wake cannot cut this sleep
    /// short, while one raised during the sleep is honored.
    fn interruptible_sleep(&self, duration: Duration) {
        self.ctx.signals.wake.clear();
        self.ctx.signals.wake.wait_up_to(duration);
    }

    fn jittered_delay(&mut self) -> Duration {
        let (min, max) = self.ctx.config.timing.jitter_bounds();
        let millis = self.rng.gen_range(min.as_millis()..=max.as_millis());
        Duration::from_millis(millis as u64)
    }

    fn random_millis(&mut self, min_ms: u64, max_ms: u64) -> Duration {
        Duration::from_millis(self.rng.gen_range(min_ms..=max_ms.max(min_ms)))
    }
}

/// Build the production capabilities and run the loop on the calling thread.
pub fn run<S: SurfaceControl>(ctx: Arc<AppContext>, alarm: Arc<AlarmController>, surface: S) {
    let Some(regions) = ctx.regions().copied() else {
        error!("Monitoring started without selected regions");
        return;
    };

    let notifier = Notifier::new(Arc::clone(&ctx));

    let pointer = match EnigoDriver::new() {
        Ok(pointer) => pointer,
        Err(err) => {
            error!("Input driver unavailable: {err}");
            ctx.log
                .post(format!("🛑 Input driver unavailable: {err}"));
            return;
        }
    };

    let capture = match ScreenshotTool::detect(&ctx.config.capture) {
        Ok(capture) => capture,
        Err(err) => {
            error!("Screen capture unavailable: {err}");
            ctx.log.post(format!("🛑 Screen capture unavailable: {err}"));
            return;
        }
    };

    let recognizer = TesseractRecognizer::new(&ctx.config.ocr);
    if !recognizer.is_available() {
        warn!("tesseract binary not found, every cycle will fail until it is installed");
        ctx.log
            .post("⚠️ tesseract not found; install it or set ocr.binary in the config");
    }

    Monitor::new(
        ctx, regions, alarm, notifier, pointer, capture, recognizer, surface,
    )
    .run();
}
