//! Pure Rust OCR backend using `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GrayImage};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{OcrEngine, TextBox};

/// Detection model file expected in the model directory.
pub const DET_MODEL: &str = "det.onnx";
/// Recognition model file expected in the model directory.
pub const REC_MODEL: &str = "latin_rec.onnx";
/// Character dictionary expected in the model directory.
pub const DICTIONARY: &str = "latin_dict.txt";

/// OCR engine backed by `pure-onnx-ocr` (no external ONNX Runtime).
pub struct OnnxEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    keep_unk: bool,
}

impl OnnxEngine {
    /// Create an engine from model files in a directory.
    pub fn from_dir(model_dir: &Path, config: &OcrConfig) -> Result<Self, OcrError> {
        let det_path = model_dir.join(DET_MODEL);
        let rec_path = model_dir.join(REC_MODEL);
        let dict_path = model_dir.join(DICTIONARY);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!("{} not found", path.display())));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self {
            engine,
            keep_unk: config.keep_unk,
        })
    }

    /// Detect and recognize text regions, sorted in reading order.
    pub fn text_boxes(&self, image: &GrayImage) -> Result<Vec<TextBox>, OcrError> {
        let start = Instant::now();
        let input = DynamicImage::ImageLuma8(image.clone());

        let results = self
            .engine
            .run_from_image(&input)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut boxes: Vec<TextBox> = results
            .iter()
            .map(|r| TextBox {
                bbox: polygon_to_bbox(&r.bounding_box),
                text: clean_text(&r.text, self.keep_unk),
                confidence: r.confidence,
            })
            .collect();
        super::sort_by_reading_order(&mut boxes);

        info!(
            "OCR complete: {} text boxes in {}ms",
            boxes.len(),
            start.elapsed().as_millis()
        );

        Ok(boxes)
    }
}

impl OcrEngine for OnnxEngine {
    fn name(&self) -> &str {
        "onnx"
    }

    fn recognize(&self, image: &GrayImage, _language: &str) -> Result<String, OcrError> {
        Ok(super::join_lines(&self.text_boxes(image)?))
    }
}

fn clean_text(text: &str, keep_unk: bool) -> String {
    if keep_unk {
        text.to_string()
    } else {
        text.replace("[UNK]", " ")
    }
}

/// Convert a `Polygon<f64>` to the `[f32; 8]` quadrilateral format.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unk_markers_removed_by_default() {
        assert_eq!(clean_text("IVA[UNK]21%", false), "IVA 21%");
        assert_eq!(clean_text("IVA[UNK]21%", true), "IVA[UNK]21%");
    }

    #[test]
    fn test_missing_models_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = OnnxEngine::from_dir(dir.path(), &OcrConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, OcrError::ModelLoad(msg) if msg.contains(DET_MODEL)));
    }
}
