//! Configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Cycle timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Pause after the simulated click before capturing, in milliseconds
    #[serde(default = "default_settle_wait_ms")]
    pub settle_wait_ms: u64,
    /// Lower bound of the randomized inter-cycle delay, in seconds
    #[serde(default = "default_refresh_min_secs")]
    pub refresh_min_secs: u64,
    /// Upper bound of the randomized inter-cycle delay, in seconds
    #[serde(default = "default_refresh_max_secs")]
    pub refresh_max_secs: u64,
    /// Delay before retrying after a failed cycle, in seconds
    #[serde(default = "default_failure_backoff_secs")]
    pub failure_backoff_secs: u64,
    /// Interval between audible alarm pulses, in milliseconds
    #[serde(default = "default_alarm_pulse_ms")]
    pub alarm_pulse_ms: u64,
}

fn default_settle_wait_ms() -> u64 {
    1500
}
fn default_refresh_min_secs() -> u64 {
    120
}
fn default_refresh_max_secs() -> u64 {
    300
}
fn default_failure_backoff_secs() -> u64 {
    30
}
fn default_alarm_pulse_ms() -> u64 {
    1000
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_wait_ms: default_settle_wait_ms(),
            refresh_min_secs: default_refresh_min_secs(),
            refresh_max_secs: default_refresh_max_secs(),
            failure_backoff_secs: default_failure_backoff_secs(),
            alarm_pulse_ms: default_alarm_pulse_ms(),
        }
    }
}

impl TimingConfig {
    pub fn settle_wait(&self) -> Duration {
        Duration::from_millis(self.settle_wait_ms)
    }

    pub fn failure_backoff(&self) -> Duration {
        Duration::from_secs(self.failure_backoff_secs)
    }

    pub fn alarm_pulse(&self) -> Duration {
        Duration::from_millis(self.alarm_pulse_ms)
    }

    /// Jitter bounds as durations, with the upper bound clamped so an
    /// inverted range in the config file cannot panic the sampler.
    pub fn jitter_bounds(&self) -> (Duration, Duration) {
        let min = Duration::from_secs(self.refresh_min_secs);
        let max = Duration::from_secs(self.refresh_max_secs.max(self.refresh_min_secs));
        (min, max)
    }
}

/// Simulated click configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickConfig {
    /// Margin kept between a click point and the button region edges, in pixels
    #[serde(default = "default_inset_px")]
    pub inset_px: i32,
    /// Pointer glide duration towards the click point, in milliseconds
    #[serde(default = "default_glide_min_ms")]
    pub glide_min_ms: u64,
    #[serde(default = "default_glide_max_ms")]
    pub glide_max_ms: u64,
    /// Pointer glide duration back to the original position, in milliseconds
    #[serde(default = "default_restore_min_ms")]
    pub restore_min_ms: u64,
    #[serde(default = "default_restore_max_ms")]
    pub restore_max_ms: u64,
}

fn default_inset_px() -> i32 {
    5
}
fn default_glide_min_ms() -> u64 {
    200
}
fn default_glide_max_ms() -> u64 {
    600
}
fn default_restore_min_ms() -> u64 {
    150
}
fn default_restore_max_ms() -> u64 {
    300
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            inset_px: default_inset_px(),
            glide_min_ms: default_glide_min_ms(),
            glide_max_ms: default_glide_max_ms(),
            restore_min_ms: default_restore_min_ms(),
            restore_max_ms: default_restore_max_ms(),
        }
    }
}

/// Push notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Base URL of the push server
    #[serde(default = "default_notify_server")]
    pub server: String,
    /// Topic appended to the server URL. Empty disables notifications.
    #[serde(default)]
    pub topic: String,
}

fn default_notify_server() -> String {
    "https://ntfy.sh".to_string()
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            server: default_notify_server(),
            topic: String::new(),
        }
    }
}

impl NotifyConfig {
    pub fn is_enabled(&self) -> bool {
        !self.topic.is_empty()
    }

    /// Full endpoint URL messages are POSTed to.
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.server.trim_end_matches('/'), self.topic)
    }
}

/// Text classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Months (1-12) that raise the alarm when a test date falls in them
    #[serde(default = "default_preferred_months")]
    pub preferred_months: Vec<u32>,
    /// Page text meaning "nothing available", matched case-insensitively
    #[serde(default = "default_steady_phrase")]
    pub steady_phrase: String,
}

fn default_preferred_months() -> Vec<u32> {
    vec![1, 2, 3, 4]
}
fn default_steady_phrase() -> String {
    "no tests found".to_string()
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            preferred_months: default_preferred_months(),
            steady_phrase: default_steady_phrase(),
        }
    }
}

/// Screen capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Screenshot tool name, or "auto" to probe for one
    #[serde(default = "default_capture_tool")]
    pub tool: String,
}

fn default_capture_tool() -> String {
    "auto".to_string()
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            tool: default_capture_tool(),
        }
    }
}

/// Text recognition configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Path to the tesseract binary. Empty means probe common locations.
    #[serde(default)]
    pub binary: String,
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub click: ClickConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
}

impl Config {
    /// Load configuration from file, seeding the default file on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
            }
            std::fs::write(&config_path, Self::default_config_str())
                .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "slotwatch", "Slotwatch")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Get the default configuration embedded in the binary
    pub fn default_config_str() -> &'static str {
        include_str!("../../config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timing.settle_wait_ms, 1500);
        assert_eq!(config.timing.refresh_min_secs, 120);
        assert_eq!(config.timing.refresh_max_secs, 300);
        assert_eq!(config.click.inset_px, 5);
        assert_eq!(config.watch.preferred_months, vec![1, 2, 3, 4]);
        assert_eq!(config.watch.steady_phrase, "no tests found");
        assert!(!config.notify.is_enabled());
    }

    #[test]
    fn test_embedded_default_matches_defaults() {
        let parsed: Config = toml::from_str(Config::default_config_str()).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.timing.settle_wait_ms, defaults.timing.settle_wait_ms);
        assert_eq!(parsed.timing.refresh_min_secs, defaults.timing.refresh_min_secs);
        assert_eq!(parsed.timing.refresh_max_secs, defaults.timing.refresh_max_secs);
        assert_eq!(
            parsed.timing.failure_backoff_secs,
            defaults.timing.failure_backoff_secs
        );
        assert_eq!(parsed.click.inset_px, defaults.click.inset_px);
        assert_eq!(parsed.notify.server, defaults.notify.server);
        assert_eq!(parsed.notify.topic, defaults.notify.topic);
        assert_eq!(parsed.watch.preferred_months, defaults.watch.preferred_months);
        assert_eq!(parsed.watch.steady_phrase, defaults.watch.steady_phrase);
        assert_eq!(parsed.capture.tool, defaults.capture.tool);
        assert_eq!(parsed.ocr.binary, defaults.ocr.binary);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [timing]
            refresh_min_secs = 60

            [notify]
            topic = "my-alerts"
            "#,
        )
        .unwrap();
        assert_eq!(config.timing.refresh_min_secs, 60);
        assert_eq!(config.timing.refresh_max_secs, 300);
        assert!(config.notify.is_enabled());
        assert_eq!(config.notify.endpoint(), "https://ntfy.sh/my-alerts");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timing.alarm_pulse_ms, config.timing.alarm_pulse_ms);
    }

    #[test]
    fn test_jitter_bounds_clamp_inverted_range() {
        let timing = TimingConfig {
            refresh_min_secs: 300,
            refresh_max_secs: 120,
            ..TimingConfig::default()
        };
        let (min, max) = timing.jitter_bounds();
        assert_eq!(min, Duration::from_secs(300));
        assert_eq!(max, Duration::from_secs(300));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let notify = NotifyConfig {
            server: "https://ntfy.sh/".to_string(),
            topic: "t".to_string(),
        };
        assert_eq!(notify.endpoint(), "https://ntfy.sh/t");
    }
}
