//! Rule-based invoice record extractor.

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::invoice::InvoiceRecord;

use super::rules::{
    default_rules, EmailRecovery, ExtractionRule, Field, FieldExtractor, FieldValue,
    PostalCityExtractor,
};
use super::InvoiceExtractor;

/// Which pattern produced a field.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleHit {
    /// Field the rule fills.
    pub field: Field,
    /// Index of the winning pattern within the rule.
    pub pattern: usize,
    /// Text matched by the pattern.
    pub source: String,
}

/// Record together with the rule hits that built it.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted record.
    pub record: InvoiceRecord,
    /// One entry per labeled field whose rule matched.
    pub hits: Vec<RuleHit>,
}

/// Applies the labeled field rules, email recovery and postal code search to OCR text.
#[derive(Debug, Clone)]
pub struct RuleExtractor {
    rules: Vec<ExtractionRule>,
    emails: EmailRecovery,
    postal: PostalCityExtractor,
}

impl RuleExtractor {
    /// Create an extractor with the default rules and heuristics.
    pub fn new() -> Self {
        Self::with_config(&ExtractionConfig::default())
    }

    pub fn with_config(config: &ExtractionConfig) -> Self {
        Self {
            rules: default_rules(),
            emails: EmailRecovery::from_config(&config.email),
            postal: PostalCityExtractor::new(),
        }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    /// Extract a record and report which pattern matched for each field.
    pub fn extract_with_hits(&self, text: &str) -> ExtractionResult {
        let mut record = InvoiceRecord::default();
        let mut hits = Vec::new();

        for rule in &self.rules {
            let Some(m) = rule.extract(text) else {
                continue;
            };

            debug!("{} matched pattern {}: {:?}", rule.field().key(), m.pattern, m.source);
            hits.push(RuleHit {
                field: rule.field(),
                pattern: m.pattern,
                source: m.source,
            });
            assign(&mut record, rule.field(), m.value);
        }

        record.emails = self.emails.recover(text);
        record.postal_code_city = self.postal.find_all(text);

        if let Some(date) = record.date {
            if date.to_naive_date().is_none() {
                debug!("Date {} is not a calendar date, keeping it as printed", date);
            }
        }

        info!(
            "Extracted {} of {} fields from {} characters of text",
            record.populated_fields(),
            InvoiceRecord::KEYS.len(),
            text.chars().count()
        );

        ExtractionResult { record, hits }
    }
}

impl Default for RuleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceExtractor for RuleExtractor {
    fn extract_from_text(&self, text: &str) -> InvoiceRecord {
        self.extract_with_hits(text).record
    }
}

fn assign(record: &mut InvoiceRecord, field: Field, value: FieldValue) {
    match field {
        Field::Date => record.date = value.into_date(),
        Field::InvoiceNumber => record.invoice_number = value.into_text(),
        Field::TaxBase => record.tax_base = value.into_amount(),
        Field::Vat => {
            record.vat_percentage = value.rate();
            record.vat = value.into_amount();
        }
        Field::SpecialTax => record.special_tax = value.into_amount(),
        Field::Total => record.total = value.into_amount(),
        Field::TaxId => record.tax_id = value.into_text(),
        Field::NationalId => record.national_id = value.into_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::InvoiceDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Option<Decimal> {
        Some(Decimal::from_str(s).unwrap())
    }

    fn extract(text: &str) -> InvoiceRecord {
        RuleExtractor::new().extract_from_text(text)
    }

    #[test]
    fn test_date_scenario() {
        assert_eq!(extract("Fecha: 05/03/24").date, Some(InvoiceDate::new(5, 3, 2024)));
    }

    #[test]
    fn test_total_scenario() {
        assert_eq!(extract("TOTAL: 123,45 €").total, dec("123.45"));
    }

    #[test]
    fn test_vat_scenario() {
        let record = extract("IVA (21%): 25,00 €");
        assert_eq!(record.vat_percentage, dec("21"));
        assert_eq!(record.vat, dec("25"));
    }

    #[test]
    fn test_vat_without_rate_leaves_percentage_absent() {
        let record = extract("IVA: 25,00 €");
        assert_eq!(record.vat, dec("25"));
        assert_eq!(record.vat_percentage, None);
    }

    #[test]
    fn test_tax_id_scenario() {
        assert_eq!(extract("CIF: B12345678").tax_id, Some("B12345678".to_string()));
    }

    #[test]
    fn test_postal_code_scenario() {
        assert_eq!(
            extract("28080, Madrid").postal_code_city,
            Some(vec!["28080, Madrid".to_string()])
        );
    }

    #[test]
    fn test_text_without_fields() {
        assert_eq!(extract(""), InvoiceRecord::default());
        assert_eq!(extract("Gracias por su visita\nvuelva pronto"), InvoiceRecord::default());
    }

    #[test]
    fn test_full_invoice() {
        let text = "FERRETERÍA LÓPEZ S.L.\n\
                    CIF: B12345678\n\
                    C/ Mayor 12, 28013, Madrid\n\
                    Factura #F2024-0042\n\
                    Fecha: 5/3/24\n\
                    Cliente: Juan Pérez  NIF: 12345678Z\n\
                    Dirección: Av. del Puerto 3, 46021, Valencia\n\
                    Email: ventasQferreterialopez.es\n\
                    BASE IMPONIBLE: 1.000,00 €\n\
                    IVA (21%): 210,00 €\n\
                    RE (5,2%): 52,00 €\n\
                    TOTAL: 1.262,00 €\n";

        let expected = InvoiceRecord {
            date: Some(InvoiceDate::new(5, 3, 2024)),
            invoice_number: Some("F2024-0042".to_string()),
            tax_base: dec("1000.00"),
            vat: dec("210.00"),
            vat_percentage: dec("21"),
            special_tax: dec("52.00"),
            total: dec("1262.00"),
            tax_id: Some("B12345678".to_string()),
            national_id: Some("12345678Z".to_string()),
            emails: Some(vec!["ventas@ferreterialopez.es".to_string()]),
            postal_code_city: Some(vec!["28013, Madrid".to_string(), "46021, Valencia".to_string()]),
        };

        assert_eq!(extract(text), expected);
    }

    #[test]
    fn test_unparseable_match_leaves_field_absent() {
        let record = extract("Fecha: 05/03/202\nTOTAL: 10,00 €");
        assert_eq!(record.date, None);
        assert_eq!(record.total, dec("10"));
    }

    #[test]
    fn test_hits_report_winning_patterns() {
        let result = RuleExtractor::new().extract_with_hits("Número de factura: A-17\nIVA 8,40 €");
        let hits: Vec<(Field, usize)> = result.hits.iter().map(|h| (h.field, h.pattern)).collect();

        assert_eq!(hits, vec![(Field::InvoiceNumber, 1), (Field::Vat, 1)]);
        assert_eq!(result.record.invoice_number, Some("A-17".to_string()));
        assert_eq!(result.record.vat, dec("8.40"));
    }
}
