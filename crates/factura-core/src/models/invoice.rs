//! Invoice record model persisted by the JSON store.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ExtractionError;

/// Fields extracted from a single invoice.
///
/// Every field is independently optional. Absent values serialize as `null`
/// and the keys are always written, so the stored JSON has a fixed shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceRecord {
    /// Invoice date (`Fecha`).
    #[serde(rename = "Fecha")]
    pub date: Option<InvoiceDate>,

    /// Invoice number (`NumeroFactura`).
    #[serde(rename = "NumeroFactura")]
    pub invoice_number: Option<String>,

    /// Tax base (`BaseImponible`).
    #[serde(rename = "BaseImponible", with = "rust_decimal::serde::arbitrary_precision_option")]
    pub tax_base: Option<Decimal>,

    /// VAT amount (`IVA`).
    #[serde(rename = "IVA", with = "rust_decimal::serde::arbitrary_precision_option")]
    pub vat: Option<Decimal>,

    /// VAT percentage (`IVA_Porcentaje`).
    #[serde(rename = "IVA_Porcentaje", with = "rust_decimal::serde::arbitrary_precision_option")]
    pub vat_percentage: Option<Decimal>,

    /// Equivalence surcharge (`RE`).
    #[serde(rename = "RE", with = "rust_decimal::serde::arbitrary_precision_option")]
    pub special_tax: Option<Decimal>,

    /// Invoice total (`Total`).
    #[serde(rename = "Total", with = "rust_decimal::serde::arbitrary_precision_option")]
    pub total: Option<Decimal>,

    /// Business tax identifier (`CIF`).
    #[serde(rename = "CIF")]
    pub tax_id: Option<String>,

    /// Personal tax identifier (`NIF`).
    #[serde(rename = "NIF")]
    pub national_id: Option<String>,

    /// Email addresses in order of appearance (`Emails`).
    #[serde(rename = "Emails")]
    pub emails: Option<Vec<String>>,

    /// `"code, city"` pairs in order of appearance (`CP_Ciudad`).
    #[serde(rename = "CP_Ciudad")]
    pub postal_code_city: Option<Vec<String>>,
}

impl InvoiceRecord {
    /// JSON keys in the order they are written.
    pub const KEYS: [&'static str; 11] = [
        "Fecha",
        "NumeroFactura",
        "BaseImponible",
        "IVA",
        "IVA_Porcentaje",
        "RE",
        "Total",
        "CIF",
        "NIF",
        "Emails",
        "CP_Ciudad",
    ];

    /// Number of populated fields.
    pub fn populated_fields(&self) -> usize {
        [
            self.date.is_some(),
            self.invoice_number.is_some(),
            self.tax_base.is_some(),
            self.vat.is_some(),
            self.vat_percentage.is_some(),
            self.special_tax.is_some(),
            self.total.is_some(),
            self.tax_id.is_some(),
            self.national_id.is_some(),
            self.emails.is_some(),
            self.postal_code_city.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// True when no field was extracted.
    pub fn is_empty(&self) -> bool {
        self.populated_fields() == 0
    }

    /// Field values rendered as strings, in [`InvoiceRecord::KEYS`] order.
    ///
    /// Absent values are `None`; lists are joined with `"; "`.
    pub fn display_values(&self) -> [Option<String>; 11] {
        let amount = |v: &Option<Decimal>| v.map(|d| d.normalize().to_string());
        let list = |v: &Option<Vec<String>>| v.as_ref().map(|items| items.join("; "));

        [
            self.date.map(|d| d.to_string()),
            self.invoice_number.clone(),
            amount(&self.tax_base),
            amount(&self.vat),
            amount(&self.vat_percentage),
            amount(&self.special_tax),
            amount(&self.total),
            self.tax_id.clone(),
            self.national_id.clone(),
            list(&self.emails),
            list(&self.postal_code_city),
        ]
    }
}

/// A day/month/year triple as printed on an invoice.
///
/// No calendar validation is performed: `31/02/2024` is a valid value. Use
/// [`InvoiceDate::to_naive_date`] when a real calendar date is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvoiceDate {
    pub day: u32,
    pub month: u32,
    pub year: u32,
}

impl InvoiceDate {
    pub fn new(day: u32, month: u32, year: u32) -> Self {
        Self { day, month, year }
    }

    /// Convert to a calendar date, if the triple names one.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        let year = i32::try_from(self.year).ok()?;
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl fmt::Display for InvoiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}

impl FromStr for InvoiceDate {
    type Err = ExtractionError;

    /// Parse the canonical `DD/MM/YYYY` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ExtractionError::Parse {
            field: "Fecha".to_string(),
            value: s.to_string(),
        };

        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 3 || parts[2].len() != 4 {
            return Err(invalid());
        }

        let number = |p: &str| -> Result<u32, ExtractionError> {
            if p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            p.parse().map_err(|_| invalid())
        };

        Ok(Self {
            day: number(parts[0])?,
            month: number(parts[1])?,
            year: number(parts[2])?,
        })
    }
}

impl Serialize for InvoiceDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InvoiceDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
