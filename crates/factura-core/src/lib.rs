//! Core library for Spanish invoice OCR processing.
//!
//! This crate provides:
//! - OCR backends behind the [`OcrEngine`] trait (Tesseract executable, pure Rust ONNX)
//! - Spanish invoice field extraction (dates, amounts, IVA, CIF/NIF, emails, postal codes)
//! - An image to record pipeline
//! - An append-only JSON record store

pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod store;

pub use error::{ExtractionError, FacturaError, OcrError, Result, StoreError};
pub use invoice::rules::{parse_amount, parse_date, EmailRecovery, Field};
pub use invoice::{ExtractionResult, InvoiceExtractor, RuleExtractor, RuleHit};
pub use models::config::FacturaConfig;
pub use models::invoice::{InvoiceDate, InvoiceRecord};
pub use ocr::{create_engine, ImagePreprocessor, OcrEngine, TesseractEngine};
#[cfg(feature = "onnx")]
pub use ocr::OnnxEngine;
pub use pipeline::{InvoicePipeline, ProcessedInvoice};
pub use store::{JsonStore, RecordStore};
