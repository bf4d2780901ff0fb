//! Rule-based field extractors for Spanish invoices.

pub mod address;
pub mod amounts;
pub mod dates;
pub mod email;
pub mod patterns;

pub use address::PostalCityExtractor;
pub use amounts::parse_amount;
pub use dates::parse_date;
pub use email::EmailRecovery;

use regex::{Captures, Match, Regex};
use rust_decimal::Decimal;

use crate::models::invoice::InvoiceDate;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in the text, with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the rule pattern that matched.
    pub pattern: usize,
    /// Byte range in source text.
    pub position: (usize, usize),
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, pattern: usize, m: Match<'_>) -> Self {
        Self {
            value,
            pattern,
            position: (m.start(), m.end()),
            source: m.as_str().to_string(),
        }
    }
}

/// Record fields populated by labeled rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    InvoiceNumber,
    TaxBase,
    Vat,
    SpecialTax,
    Total,
    TaxId,
    NationalId,
}

impl Field {
    /// Key of the field in the stored JSON record.
    pub fn key(self) -> &'static str {
        match self {
            Field::Date => "Fecha",
            Field::InvoiceNumber => "NumeroFactura",
            Field::TaxBase => "BaseImponible",
            Field::Vat => "IVA",
            Field::SpecialTax => "RE",
            Field::Total => "Total",
            Field::TaxId => "CIF",
            Field::NationalId => "NIF",
        }
    }

    /// How captured groups are turned into a value for this field.
    pub fn interpretation(self) -> Interpretation {
        match self {
            Field::Date => Interpretation::Date,
            Field::InvoiceNumber | Field::TaxId | Field::NationalId => Interpretation::Text,
            Field::TaxBase | Field::SpecialTax | Field::Total => Interpretation::Amount,
            Field::Vat => Interpretation::RateAndAmount,
        }
    }
}

/// Capture group interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    /// Group 1 through [`parse_date`].
    Date,
    /// Group 1, trimmed.
    Text,
    /// Group 1 through [`parse_amount`].
    Amount,
    /// Two-group patterns: rate in group 1, amount in group 2.
    /// One-group patterns: amount in group 1.
    RateAndAmount,
}

/// Normalized value of a matched rule. Inner `None` means the pattern matched
/// but normalization rejected the captured text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Date(Option<InvoiceDate>),
    Text(Option<String>),
    Amount(Option<Decimal>),
    RateAndAmount {
        rate: Option<Decimal>,
        amount: Option<Decimal>,
    },
}

impl FieldValue {
    pub fn into_date(self) -> Option<InvoiceDate> {
        match self {
            FieldValue::Date(date) => date,
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(text) => text,
            _ => None,
        }
    }

    pub fn into_amount(self) -> Option<Decimal> {
        match self {
            FieldValue::Amount(amount) | FieldValue::RateAndAmount { amount, .. } => amount,
            _ => None,
        }
    }

    pub fn rate(&self) -> Option<Decimal> {
        match self {
            FieldValue::RateAndAmount { rate, .. } => *rate,
            _ => None,
        }
    }
}

/// A field with its candidate patterns in priority order.
///
/// The first pattern that matches anywhere in the text is used exclusively;
/// later patterns are not tried even if normalization of the match fails.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    field: Field,
    patterns: Vec<&'static Regex>,
}

impl ExtractionRule {
    pub fn new(field: Field, patterns: Vec<&'static Regex>) -> Self {
        Self { field, patterns }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn patterns(&self) -> &[&'static Regex] {
        &self.patterns
    }

    fn interpret(&self, pattern: &Regex, caps: &Captures<'_>) -> FieldValue {
        let group = |i: usize| caps.get(i).map(|m| m.as_str());

        match self.field.interpretation() {
            Interpretation::Date => FieldValue::Date(group(1).and_then(parse_date)),
            Interpretation::Text => FieldValue::Text(
                group(1)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            ),
            Interpretation::Amount => FieldValue::Amount(group(1).and_then(parse_amount)),
            // captures_len counts the implicit whole-match group
            Interpretation::RateAndAmount if pattern.captures_len() > 2 => FieldValue::RateAndAmount {
                rate: group(1).and_then(parse_amount),
                amount: group(2).and_then(parse_amount),
            },
            Interpretation::RateAndAmount => FieldValue::RateAndAmount {
                rate: None,
                amount: group(1).and_then(parse_amount),
            },
        }
    }
}

impl FieldExtractor for ExtractionRule {
    type Output = ExtractionMatch<FieldValue>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.patterns.iter().enumerate().find_map(|(index, pattern)| {
            let caps = pattern.captures(text)?;
            let whole = caps.get(0)?;
            Some(ExtractionMatch::new(self.interpret(pattern, &caps), index, whole))
        })
    }

    /// Every match of the first pattern that matches at all.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        for (index, pattern) in self.patterns.iter().enumerate() {
            let matches: Vec<_> = pattern
                .captures_iter(text)
                .filter_map(|caps| {
                    let whole = caps.get(0)?;
                    Some(ExtractionMatch::new(self.interpret(pattern, &caps), index, whole))
                })
                .collect();

            if !matches.is_empty() {
                return matches;
            }
        }

        Vec::new()
    }
}

/// The labeled field rules, in evaluation order.
pub fn default_rules() -> Vec<ExtractionRule> {
    use patterns::*;

    vec![
        ExtractionRule::new(Field::Date, vec![&*FECHA]),
        ExtractionRule::new(Field::InvoiceNumber, vec![&*NUMERO_FACTURA, &*NUMERO_FACTURA_LABELED]),
        ExtractionRule::new(Field::TaxBase, vec![&*BASE_IMPONIBLE, &*TOTAL_BASE_IMPONIBLE]),
        ExtractionRule::new(Field::Vat, vec![&*IVA_RATE_AMOUNT, &*IVA_AMOUNT, &*INA_MISREAD]),
        ExtractionRule::new(Field::SpecialTax, vec![&*RECARGO]),
        ExtractionRule::new(Field::Total, vec![&*TOTAL, &*TOTAL_MISREAD]),
        ExtractionRule::new(Field::TaxId, vec![&*CIF_NIF, &*CIF]),
        ExtractionRule::new(Field::NationalId, vec![&*NIF]),
    ]
}
