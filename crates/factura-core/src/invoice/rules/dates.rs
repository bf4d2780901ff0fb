//! Date normalization.

use tracing::warn;

use crate::models::invoice::InvoiceDate;

use super::patterns::DATE_DMY;

/// Parse a leading day/month/year date such as "5/3/24" or "05-03-2024".
///
/// Separators may be `/` or `-` in any mix. Two-digit years are read as
/// 20YY; three-digit years are rejected. The calendar is not checked, so
/// "31/02/2024" is accepted as printed.
pub fn parse_date(raw: &str) -> Option<InvoiceDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let Some(caps) = DATE_DMY.captures(raw) else {
        warn!("Invalid date format: {:?}", raw);
        return None;
    };

    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: u32 = caps[3].parse().ok()?;

    let year = match caps[3].len() {
        2 => 2000 + year,
        4 => year,
        _ => {
            warn!("Invalid year in date: {:?}", raw);
            return None;
        }
    };

    Some(InvoiceDate::new(day, month, year))
}
