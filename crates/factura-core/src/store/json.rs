//! JSON array file store.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::error::StoreError;
use crate::models::invoice::InvoiceRecord;

use super::RecordStore;

/// Serialize with four-space indentation, leaving non-ASCII text unescaped.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Records kept as a pretty-printed JSON array in one file.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored array as raw JSON values.
    ///
    /// A missing or empty file is an empty store. Valid JSON that is not an
    /// array is discarded with a warning and the store starts over; content
    /// that does not parse is an error, so a damaged file is never overwritten.
    pub fn load_values(&self) -> Result<Vec<Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(values)) => Ok(values),
            Ok(_) => {
                warn!(
                    "{} does not hold a JSON array, starting a new one",
                    self.path.display()
                );
                Ok(Vec::new())
            }
            Err(source) => Err(StoreError::Parse {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write_values(&self, values: &[Value]) -> Result<(), StoreError> {
        let content = to_pretty_json(values)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        // Write next to the target, then rename over it.
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl RecordStore for JsonStore {
    fn append(&self, record: &InvoiceRecord) -> Result<usize, StoreError> {
        let result = self.load_values().and_then(|mut values| {
            values.push(serde_json::to_value(record)?);
            self.write_values(&values)?;
            Ok(values.len())
        });

        match &result {
            Ok(count) => info!("Saved record to {} ({} total)", self.path.display(), count),
            Err(e) => error!("Failed to save record to {}: {}", self.path.display(), e),
        }
        result
    }

    fn records(&self) -> Result<Vec<InvoiceRecord>, StoreError> {
        self.load_values()?
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value(value).map_err(|source| StoreError::Decode { index, source })
            })
            .collect()
    }
}
