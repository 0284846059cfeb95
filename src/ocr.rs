//! Text recognition
//!
//! Recognition shells out to the tesseract binary: the raster goes to a temp
//! PNG, tesseract prints recognized text on stdout.

use crate::core::config::OcrConfig;
use image::DynamicImage;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("tesseract binary not found at {0:?}")]
    NotFound(PathBuf),
    #[error("tesseract failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to write capture for recognition: {0}")]
    Image(#[from] image::ImageError),
}

/// Text recognition capability consumed by the polling loop.
pub trait Recognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// tesseract CLI client.
pub struct TesseractRecognizer {
    binary_path: PathBuf,
}

impl TesseractRecognizer {
    /// Create a recognizer, honoring a configured binary path or probing
    /// common install locations.
    pub fn new(config: &OcrConfig) -> Self {
        if !config.binary.is_empty() {
            return Self {
                binary_path: PathBuf::from(&config.binary),
            };
        }
        Self {
            binary_path: Self::default_binary_path(),
        }
    }

    /// Get the default binary path
    fn default_binary_path() -> PathBuf {
        let paths = [
            PathBuf::from("/opt/homebrew/bin/tesseract"),
            PathBuf::from("/usr/local/bin/tesseract"),
            PathBuf::from("/usr/bin/tesseract"),
        ];

        for path in paths {
            if path.exists() {
                return path;
            }
        }

        // Fall back to PATH resolution at spawn time
        PathBuf::from("tesseract")
    }

    /// Check if the binary is available
    pub fn is_available(&self) -> bool {
        if self.binary_path.is_absolute() {
            return self.binary_path.exists();
        }
        Command::new(&self.binary_path)
            .arg("--version")
            .output()
            .is_ok()
    }
}

impl Recognizer for TesseractRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let temp_path =
            std::env::temp_dir().join(format!("slotwatch_ocr_{}.png", std::process::id()));
        image.save(&temp_path)?;

        debug!("Running tesseract on {}", temp_path.display());
        let result = Command::new(&self.binary_path)
            .arg(&temp_path)
            .arg("stdout")
            .args(["--psm", "6"])
            .output();

        let _ = std::fs::remove_file(&temp_path);

        let output = match result {
            Ok(output) => output,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(OcrError::NotFound(self.binary_path.clone()));
            }
            Err(err) => return Err(err.into()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Failed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_binary_wins() {
        let config = OcrConfig {
            binary: "/custom/tesseract".to_string(),
        };
        let recognizer = TesseractRecognizer::new(&config);
        assert_eq!(recognizer.binary_path, PathBuf::from("/custom/tesseract"));
    }

    #[test]
    fn test_default_binary_path() {
        let recognizer = TesseractRecognizer::new(&OcrConfig::default());
        // Probing must settle on something usable as a command
        assert!(!recognizer.binary_path.as_os_str().is_empty());
    }

    #[test]
    fn test_missing_binary_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = OcrConfig {
            binary: dir.path().join("tesseract").display().to_string(),
        };
        let recognizer = TesseractRecognizer::new(&config);
        assert!(!recognizer.is_available());

        let image = DynamicImage::new_rgba8(2, 2);
        assert!(matches!(
            recognizer.recognize(&image),
            Err(OcrError::NotFound(_))
        ));
    }
}
