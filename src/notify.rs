//! Push notification delivery
//!
//! Fire-and-forget: `send` enqueues the message and returns immediately; a
//! worker thread POSTs each message to the configured topic endpoint.
//! Delivery failures produce a log line and nothing else.

use crate::core::context::AppContext;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Best-effort push notifier over an ntfy-style topic endpoint.
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<String>>,
}

impl Notifier {
    /// Create a notifier and its delivery worker. With no topic configured
    /// the notifier is inert and `send` is a no-op.
    pub fn new(ctx: Arc<AppContext>) -> Self {
        if !ctx.config.notify.is_enabled() {
            info!("Push notifications disabled (no topic configured)");
            return Self { tx: None };
        }

        let endpoint = ctx.config.notify.endpoint();
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        thread::spawn(move || {
            let client = match reqwest::blocking::Client::builder()
                .timeout(DELIVERY_TIMEOUT)
                .build()
            {
                Ok(client) => client,
                Err(err) => {
                    warn!("Failed to build notification client: {err}");
                    return;
                }
            };

            while let Some(message) = rx.blocking_recv() {
                match client.post(&endpoint).body(message).send() {
                    Ok(response) if response.status().is_success() => {
                        info!("Alert sent");
                        ctx.log.post("Alert sent!");
                    }
                    Ok(response) => {
                        warn!("Notification endpoint returned {}", response.status());
                        ctx.log.post(format!(
                            "⚠️ Notification rejected ({})",
                            response.status()
                        ));
                    }
                    Err(err) => {
                        warn!("Failed to deliver notification: {err}");
                        ctx.log.post("⚠️ Notification delivery failed");
                    }
                }
            }
        });

        Self { tx: Some(tx) }
    }

    /// A notifier that never delivers anything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Queue a message for delivery and return immediately.
    pub fn send(&self, message: impl Into<String>) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(message.into());
        }
    }
}
