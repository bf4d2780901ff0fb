//! OCR backends that turn a prepared invoice image into plain text.
//!
//! The extraction pipeline only depends on the [`OcrEngine`] trait. Two
//! backends are provided: [`TesseractEngine`], which runs an external
//! `tesseract` executable at a configurable path, and `OnnxEngine` (feature
//! `onnx`), which runs PaddleOCR models in pure Rust.

#[cfg(feature = "onnx")]
mod onnx;
mod preprocessing;
mod tesseract;

#[cfg(feature = "onnx")]
pub use onnx::OnnxEngine;
pub use preprocessing::ImagePreprocessor;
pub use tesseract::TesseractEngine;

use image::GrayImage;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::OcrError;
use crate::models::config::{OcrBackend, OcrConfig};

/// Something that can read text out of a grayscale image.
pub trait OcrEngine {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Recognize all text in the image. `language` is a backend hint such as `spa`.
    fn recognize(&self, image: &GrayImage, language: &str) -> Result<String, OcrError>;
}

impl<E: OcrEngine + ?Sized> OcrEngine for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn recognize(&self, image: &GrayImage, language: &str) -> Result<String, OcrError> {
        (**self).recognize(image, language)
    }
}

/// Build the backend selected in the configuration.
pub fn create_engine(config: &OcrConfig) -> Result<Box<dyn OcrEngine>, OcrError> {
    let engine: Box<dyn OcrEngine> = match config.backend {
        OcrBackend::Tesseract => Box::new(TesseractEngine::new(&config.tesseract_path)),
        #[cfg(feature = "onnx")]
        OcrBackend::Onnx => Box::new(OnnxEngine::from_dir(&config.model_dir, config)?),
        #[cfg(not(feature = "onnx"))]
        OcrBackend::Onnx => {
            return Err(OcrError::ModelLoad(
                "ONNX backend not compiled in; rebuild with the `onnx` feature".to_string(),
            ));
        }
    };

    info!("Using {} OCR backend", engine.name());
    Ok(engine)
}

/// A recognized text region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    /// Quadrilateral corners (x1, y1, x2, y2, x3, y3, x4, y4).
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Sort boxes top-to-bottom, then left-to-right within rows of 20 pixels.
pub fn sort_by_reading_order(boxes: &mut [TextBox]) {
    boxes.sort_by(|a, b| {
        let (ax, ay, _, _) = a.rect();
        let (bx, by, _, _) = b.rect();

        let row_a = (ay / 20.0) as i32;
        let row_b = (by / 20.0) as i32;

        row_a
            .cmp(&row_b)
            .then(ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal))
    });
}

/// Join box texts into one line per box.
pub fn join_lines(boxes: &[TextBox]) -> String {
    boxes
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
