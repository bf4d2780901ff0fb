//! Persistence of extracted invoice records.
//!
//! A store is an ordered, append-only collection of records. [`JsonStore`]
//! keeps them as a JSON array in a single file and rewrites the whole file on
//! every append. It assumes a single writer: two processes appending to the
//! same file at once can lose one of the records.

mod json;

pub use json::{to_pretty_json, JsonStore};

use crate::error::StoreError;
use crate::models::invoice::InvoiceRecord;

/// Append-only storage for invoice records.
pub trait RecordStore {
    /// Add a record after the existing ones and return the new record count.
    fn append(&self, record: &InvoiceRecord) -> Result<usize, StoreError>;

    /// All stored records, oldest first.
    fn records(&self) -> Result<Vec<InvoiceRecord>, StoreError>;
}
