//! Invoice field extraction module.

mod extractor;
pub mod rules;

pub use extractor::{ExtractionResult, RuleExtractor, RuleHit};

use crate::models::invoice::InvoiceRecord;

/// Trait for invoice field extractors.
pub trait InvoiceExtractor {
    /// Extract invoice data from plain text.
    ///
    /// Never fails: fields that cannot be found are left absent.
    fn extract_from_text(&self, text: &str) -> InvoiceRecord;
}
