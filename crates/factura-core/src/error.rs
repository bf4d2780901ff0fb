//! Error types for the factura-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the factura library.
#[derive(Error, Debug)]
pub enum FacturaError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Record store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Image loading error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by an OCR backend.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR executable could not be started.
    #[error("failed to run {executable}: {source}")]
    Spawn {
        executable: String,
        source: std::io::Error,
    },

    /// The OCR executable ran but reported a failure.
    #[error("{executable} exited with status {}: {stderr}", status.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    Failed {
        executable: String,
        status: Option<i32>,
        stderr: String,
    },

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The image could not be handed to the backend.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors raised by the JSON record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The backing file exists but does not hold valid JSON.
    #[error("{} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Records could not be serialized.
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A stored element is not a valid invoice record.
    #[error("element {index} is not an invoice record: {source}")]
    Decode {
        index: usize,
        source: serde_json::Error,
    },
}

/// Errors related to invoice field values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

/// Result type for the factura library.
pub type Result<T> = std::result::Result<T, FacturaError>;
