//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FacturaError, Result};

/// Main configuration for the factura pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacturaConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Record store configuration.
    pub store: StoreConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Which OCR backend to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackend {
    /// External Tesseract executable.
    #[default]
    Tesseract,
    /// Built-in ONNX models (pure Rust).
    Onnx,
}

/// OCR engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Backend used to turn images into text.
    pub backend: OcrBackend,

    /// Path to the Tesseract executable. A bare name is looked up on `PATH`.
    pub tesseract_path: PathBuf,

    /// Language hint passed to the backend.
    pub language: String,

    /// Directory with `det.onnx`, `latin_rec.onnx` and `latin_dict.txt` for the ONNX backend.
    pub model_dir: PathBuf,

    /// Maximum image dimension (longer side) before OCR; 0 disables resizing.
    pub max_image_size: u32,

    /// Apply adaptive thresholding to the grayscale image before OCR.
    pub binarize: bool,

    /// Keep `[UNK]` markers emitted by the ONNX recognizer.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackend::Tesseract,
            tesseract_path: PathBuf::from("tesseract"),
            language: "spa".to_string(),
            model_dir: PathBuf::from("models"),
            max_image_size: 0,
            binarize: false,
            keep_unk: false,
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file that accumulates extracted records.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("datos_extraidos.json"),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Email recovery heuristics.
    pub email: EmailConfig,
}

/// Characters OCR commonly produces in place of `@` and `0` inside email addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Letters read instead of `@`. Only substituted when a candidate has no `@`.
    pub at_misreads: Vec<char>,

    /// Letters read instead of the digit `0`.
    pub zero_misreads: Vec<char>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            at_misreads: vec!['Q', 'G'],
            zero_misreads: vec!['O'],
        }
    }
}

impl FacturaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FacturaError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FacturaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
