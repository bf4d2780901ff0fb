//! Image to invoice record pipeline.

use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info};

use crate::error::Result;
use crate::invoice::{ExtractionResult, InvoiceExtractor, RuleExtractor};
use crate::models::config::FacturaConfig;
use crate::models::invoice::InvoiceRecord;
use crate::ocr::{ImagePreprocessor, OcrEngine};

/// Outcome of processing one invoice image.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedInvoice {
    /// Extracted record.
    pub record: InvoiceRecord,
    /// Text returned by the OCR backend.
    pub raw_text: String,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Runs OCR on an invoice image and extracts a record from the text.
pub struct InvoicePipeline<E: OcrEngine> {
    engine: E,
    extractor: RuleExtractor,
    preprocessor: ImagePreprocessor,
    language: String,
}

impl<E: OcrEngine> InvoicePipeline<E> {
    pub fn new(engine: E, config: &FacturaConfig) -> Self {
        Self {
            engine,
            extractor: RuleExtractor::with_config(&config.extraction),
            preprocessor: ImagePreprocessor::new()
                .with_max_size(config.ocr.max_image_size)
                .with_binarize(config.ocr.binarize),
            language: config.ocr.language.clone(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Load an image and return the text the OCR backend reads from it.
    pub fn recognize(&self, path: &Path) -> Result<String> {
        info!("Reading {}", path.display());

        let image = self.preprocessor.load(path).map_err(|e| {
            error!("Failed to load image {}: {}", path.display(), e);
            e
        })?;

        let text = self.engine.recognize(&image, &self.language).map_err(|e| {
            error!("OCR failed on {}: {}", path.display(), e);
            e
        })?;

        info!("{} returned {} characters", self.engine.name(), text.chars().count());
        Ok(text)
    }

    /// OCR an invoice image and extract its fields.
    ///
    /// Image or OCR failures are returned without a partial record.
    pub fn process_image(&self, path: &Path) -> Result<ProcessedInvoice> {
        let start = Instant::now();

        let raw_text = self.recognize(path)?;
        let record = self.extractor.extract_from_text(&raw_text);

        Ok(ProcessedInvoice {
            record,
            raw_text,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Extract fields from text that has already been through OCR.
    pub fn process_text(&self, text: &str) -> InvoiceRecord {
        self.extractor.extract_from_text(text)
    }

    /// Like [`process_text`](Self::process_text), also reporting which pattern matched each field.
    pub fn explain_text(&self, text: &str) -> ExtractionResult {
        self.extractor.extract_with_hits(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FacturaError, OcrError};
    use image::GrayImage;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::cell::RefCell;

    /// Returns canned text and remembers what it was given.
    struct StubEngine {
        text: String,
        seen: RefCell<Vec<(u32, u32, String)>>,
    }

    impl StubEngine {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl OcrEngine for StubEngine {
        fn name(&self) -> &str {
            "stub"
        }

        fn recognize(&self, image: &GrayImage, language: &str) -> std::result::Result<String, OcrError> {
            self.seen
                .borrow_mut()
                .push((image.width(), image.height(), language.to_string()));
            Ok(self.text.clone())
        }
    }

    struct FailingEngine;

    impl OcrEngine for FailingEngine {
        fn name(&self) -> &str {
            "failing"
        }

        fn recognize(&self, _image: &GrayImage, _language: &str) -> std::result::Result<String, OcrError> {
            Err(OcrError::Recognition("no text layer".to_string()))
        }
    }

    fn write_image(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("factura.png");
        image::RgbImage::from_pixel(30, 12, image::Rgb([250, 250, 250]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_process_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path());
        let pipeline = InvoicePipeline::new(
            StubEngine::new("Factura #F-9\nTOTAL: 123,45 €"),
            &FacturaConfig::default(),
        );

        let processed = pipeline.process_image(&path).unwrap();

        assert_eq!(processed.raw_text, "Factura #F-9\nTOTAL: 123,45 €");
        assert_eq!(processed.record.invoice_number, Some("F-9".to_string()));
        assert_eq!(processed.record.total, Some(Decimal::new(12345, 2)));
        assert_eq!(
            *pipeline.engine().seen.borrow(),
            vec![(30, 12, "spa".to_string())]
        );
    }

    #[test]
    fn test_language_and_resize_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path());
        let mut config = FacturaConfig::default();
        config.ocr.language = "spa+eng".to_string();
        config.ocr.max_image_size = 15;

        let pipeline = InvoicePipeline::new(StubEngine::new(""), &config);
        let processed = pipeline.process_image(&path).unwrap();

        assert!(processed.record.is_empty());
        assert_eq!(
            *pipeline.engine().seen.borrow(),
            vec![(15, 6, "spa+eng".to_string())]
        );
    }

    #[test]
    fn test_missing_image() {
        let pipeline = InvoicePipeline::new(StubEngine::new("TOTAL: 1,00 €"), &FacturaConfig::default());
        let err = pipeline
            .process_image(Path::new("/nonexistent/factura.png"))
            .unwrap_err();

        assert!(matches!(err, FacturaError::Image(_)));
        assert!(pipeline.engine().seen.borrow().is_empty());
    }

    #[test]
    fn test_ocr_failure_yields_no_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path());
        let pipeline = InvoicePipeline::new(FailingEngine, &FacturaConfig::default());

        let err = pipeline.process_image(&path).unwrap_err();
        assert!(matches!(err, FacturaError::Ocr(OcrError::Recognition(_))));
    }

    #[test]
    fn test_process_text_skips_ocr() {
        let pipeline = InvoicePipeline::new(FailingEngine, &FacturaConfig::default());
        let record = pipeline.process_text("CIF: B12345678");

        assert_eq!(record.tax_id, Some("B12345678".to_string()));
    }
}
