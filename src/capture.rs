//! Screen-region capture
//!
//! Captures go through an external screenshot tool: the region is written to
//! a temp PNG and decoded with the image crate. Tool discovery probes for
//! whatever the platform provides.

use crate::core::config::CaptureConfig;
use crate::core::region::Region;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no screenshot tool found (tried screencapture, grim, maim)")]
    NoTool,
    #[error("screenshot tool {0:?} not found on PATH")]
    ToolMissing(String),
    #[error("screenshot tool failed: {0}")]
    ToolFailed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to decode captured image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Region capture capability consumed by the polling loop.
pub trait RegionCapture {
    fn capture(&self, region: &Region) -> Result<DynamicImage, CaptureError>;
}

/// The screenshot tools this backend knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolKind {
    /// macOS `screencapture -x -R`
    Screencapture,
    /// Wayland `grim -g`
    Grim,
    /// X11 `maim -g`
    Maim,
}

impl ToolKind {
    fn binary_name(&self) -> &'static str {
        match self {
            ToolKind::Screencapture => "screencapture",
            ToolKind::Grim => "grim",
            ToolKind::Maim => "maim",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "screencapture" => Some(ToolKind::Screencapture),
            "grim" => Some(ToolKind::Grim),
            "maim" => Some(ToolKind::Maim),
            _ => None,
        }
    }

    /// Arguments that capture `region` into `output`.
    fn region_args(&self, region: &Region, output: &Path) -> Vec<String> {
        let (l, t, w, h) = (region.left, region.top, region.width(), region.height());
        match self {
            ToolKind::Screencapture => vec![
                "-x".to_string(),
                "-R".to_string(),
                format!("{l},{t},{w},{h}"),
                output.display().to_string(),
            ],
            ToolKind::Grim => vec![
                "-g".to_string(),
                format!("{l},{t} {w}x{h}"),
                output.display().to_string(),
            ],
            ToolKind::Maim => vec![
                "-g".to_string(),
                format!("{w}x{h}+{l}+{t}"),
                output.display().to_string(),
            ],
        }
    }
}

/// Subprocess screenshot backend.
pub struct ScreenshotTool {
    kind: ToolKind,
    binary: PathBuf,
}

impl ScreenshotTool {
    /// Resolve the configured tool, or probe for one when set to "auto".
    pub fn detect(config: &CaptureConfig) -> Result<Self, CaptureError> {
        if config.tool != "auto" {
            let kind = ToolKind::from_name(&config.tool)
                .ok_or_else(|| CaptureError::ToolMissing(config.tool.clone()))?;
            let binary = find_in_path(kind.binary_name())
                .ok_or_else(|| CaptureError::ToolMissing(config.tool.clone()))?;
            return Ok(Self { kind, binary });
        }

        for kind in [ToolKind::Screencapture, ToolKind::Grim, ToolKind::Maim] {
            if let Some(binary) = find_in_path(kind.binary_name()) {
                debug!("Using screenshot tool {}", binary.display());
                return Ok(Self { kind, binary });
            }
        }
        Err(CaptureError::NoTool)
    }
}

impl RegionCapture for ScreenshotTool {
    fn capture(&self, region: &Region) -> Result<DynamicImage, CaptureError> {
        let output_path =
            std::env::temp_dir().join(format!("slotwatch_capture_{}.png", std::process::id()));

        trace!("Capturing {:?} via {}", region, self.binary.display());
        let output = Command::new(&self.binary)
            .args(self.kind.region_args(region, &output_path))
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::ToolFailed(stderr.trim().to_string()));
        }

        let image = image::open(&output_path);
        let _ = std::fs::remove_file(&output_path);
        Ok(image?)
    }
}

/// Search PATH for an executable by name.
fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}
