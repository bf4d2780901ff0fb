//! Email recovery from OCR text.
//!
//! OCR regularly reads "@" as a capital `Q` or `G` and the digit `0` as `O`.
//! Candidates are collected loosely, repaired, and kept only if the repaired
//! string is a well-formed address. Both false positives and misses are
//! expected on noisy scans.

use tracing::trace;

use crate::models::config::EmailConfig;

use super::patterns::{EMAIL, EMAIL_CANDIDATE};
use super::FieldExtractor;

/// Email extractor with OCR misread repair.
#[derive(Debug, Clone)]
pub struct EmailRecovery {
    at_misreads: Vec<char>,
    zero_misreads: Vec<char>,
}

impl EmailRecovery {
    /// Create an extractor with the default misread sets (`Q`/`G` for `@`, `O` for `0`).
    pub fn new() -> Self {
        Self::from_config(&EmailConfig::default())
    }

    pub fn from_config(config: &EmailConfig) -> Self {
        Self {
            at_misreads: config.at_misreads.clone(),
            zero_misreads: config.zero_misreads.clone(),
        }
    }

    /// All recovered addresses in order of appearance, or `None` if there are none.
    pub fn recover(&self, text: &str) -> Option<Vec<String>> {
        let emails = self.extract_all(text);
        if emails.is_empty() { None } else { Some(emails) }
    }

    /// Apply the misread substitutions to one candidate.
    pub fn repair(&self, candidate: &str) -> String {
        let has_at = candidate.contains('@');
        candidate
            .chars()
            .map(|c| {
                if !has_at && self.at_misreads.contains(&c) {
                    '@'
                } else if self.zero_misreads.contains(&c) {
                    '0'
                } else {
                    c
                }
            })
            .collect()
    }
}

impl Default for EmailRecovery {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for EmailRecovery {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        EMAIL_CANDIDATE
            .find_iter(text)
            .filter_map(|m| {
                let repaired = self.repair(m.as_str());
                if EMAIL.is_match(&repaired) {
                    Some(repaired)
                } else {
                    trace!("Discarding email candidate {:?}", m.as_str());
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recover(text: &str) -> Option<Vec<String>> {
        EmailRecovery::new().recover(text)
    }

    #[test]
    fn test_valid_email_is_unchanged() {
        assert_eq!(
            recover("Contacto: info@empresa.es"),
            Some(vec!["info@empresa.es".to_string()])
        );
        assert_eq!(
            recover("user@domain.tld"),
            Some(vec!["user@domain.tld".to_string()])
        );
    }

    #[test]
    fn test_repairs_at_misreads() {
        assert_eq!(recover("userQdomain.tld"), Some(vec!["user@domain.tld".to_string()]));
        assert_eq!(recover("userGdomain.com"), Some(vec!["user@domain.com".to_string()]));
    }

    #[test]
    fn test_repairs_zero_misread() {
        assert_eq!(recover("infoQdominiO1.es"), Some(vec!["info@domini01.es".to_string()]));
    }

    #[test]
    fn test_existing_at_is_not_doubled() {
        assert_eq!(
            recover("GARCIA@empresa.es"),
            Some(vec!["GARCIA@empresa.es".to_string()])
        );
    }

    #[test]
    fn test_keeps_order_of_appearance() {
        let text = "Escríbenos a soporteQtienda.com o a ventas@tienda.com.";
        assert_eq!(
            recover(text),
            Some(vec![
                "soporte@tienda.com".to_string(),
                "ventas@tienda.com".to_string(),
            ])
        );
    }

    #[test]
    fn test_rejects_non_emails() {
        assert_eq!(recover("www.empresa.es"), None);
        assert_eq!(recover("BASE IMPONIBLE: 1.000,00"), None);
        assert_eq!(recover("ventasQtiendaQ.com"), None);
        assert_eq!(recover(""), None);
    }

    #[test]
    fn test_custom_misreads() {
        let config = EmailConfig {
            at_misreads: vec!['Q'],
            zero_misreads: Vec::new(),
        };
        let recovery = EmailRecovery::from_config(&config);

        assert_eq!(recovery.recover("userGdomain.com"), None);
        assert_eq!(recovery.repair("userQdomain.tld"), "user@domain.tld");
    }
}
