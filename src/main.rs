//! Slotwatch - Entry Point
//!
//! Loads configuration, builds the shared application context, and runs the
//! control surface. The polling loop is spawned by the window layer once
//! both screen regions have been selected.

use anyhow::{bail, Result};
use slotwatch::{window, AppContext, Config};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting slotwatch");

    let config = Config::load()?;
    info!("Configuration loaded");

    let context = Arc::new(AppContext::new(config));

    window::run(Arc::clone(&context))?;

    if context.regions().is_none() {
        bail!("no region selected during startup; nothing to monitor");
    }

    info!("Shutdown complete");
    Ok(())
}
