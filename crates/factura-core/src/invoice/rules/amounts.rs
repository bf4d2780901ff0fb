//! Amount normalization.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

/// Parse an amount as printed on an invoice (e.g. "1.234,56 €" or "25,00").
///
/// Everything except ASCII digits, commas and periods is dropped. The last
/// separator is the decimal point and any earlier ones are thousands
/// separators, so "1.234,56" and "1,234.56" both read as 1234.56 while a lone
/// "1.234" reads as 1.234.
///
/// Returns `None` when nothing numeric is left. A value that still fails to
/// parse (e.g. out of range) is logged and also yields `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match cleaned.rfind([',', '.']) {
        Some(pos) => {
            let integer: String = cleaned[..pos].chars().filter(char::is_ascii_digit).collect();
            let integer = if integer.is_empty() { "0".to_string() } else { integer };
            let fraction = &cleaned[pos + 1..];

            if fraction.is_empty() {
                integer
            } else {
                format!("{}.{}", integer, fraction)
            }
        }
        None => cleaned,
    };

    match Decimal::from_str(&normalized) {
        Ok(amount) => Some(amount),
        Err(e) => {
            warn!("Could not convert amount {:?}: {}", raw, e);
            None
        }
    }
}
