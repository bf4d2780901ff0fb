//! OCR backend that shells out to a Tesseract executable.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use image::{GrayImage, ImageFormat};
use tracing::{debug, info};

use crate::error::OcrError;

use super::OcrEngine;

/// Runs `<executable> <image> stdout -l <language>` and returns what it prints.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    executable: PathBuf,
}

impl TesseractEngine {
    /// Create an engine for the given executable. A bare name is resolved through `PATH`.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn executable_name(&self) -> String {
        self.executable.display().to_string()
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &GrayImage, language: &str) -> Result<String, OcrError> {
        let start = Instant::now();

        // Tesseract reads from a file; the temp file is removed when dropped.
        let input = tempfile::Builder::new()
            .prefix("factura-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::InvalidImage(format!("failed to create temp file: {}", e)))?;
        image
            .save_with_format(input.path(), ImageFormat::Png)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        debug!(
            "Running {} on {} ({}x{}, language {})",
            self.executable_name(),
            input.path().display(),
            image.width(),
            image.height(),
            language
        );

        let output = Command::new(&self.executable)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .output()
            .map_err(|source| OcrError::Spawn {
                executable: self.executable_name(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                executable: self.executable_name(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(
            "Tesseract returned {} characters in {}ms",
            text.chars().count(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}
