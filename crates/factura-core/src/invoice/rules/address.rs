//! Postal code and city extraction.

use super::patterns::POSTAL_CODE_CITY;
use super::FieldExtractor;

/// Finds every "28080, Madrid" style postal code/city pair.
///
/// Unlike the labeled fields this is exhaustive: an invoice usually carries
/// both the issuer's and the customer's address.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostalCityExtractor;

impl PostalCityExtractor {
    pub fn new() -> Self {
        Self
    }

    /// All pairs as `"code, city"`, or `None` if there are none.
    pub fn find_all(&self, text: &str) -> Option<Vec<String>> {
        let pairs = self.extract_all(text);
        if pairs.is_empty() { None } else { Some(pairs) }
    }
}

impl FieldExtractor for PostalCityExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        POSTAL_CODE_CITY
            .captures_iter(text)
            .filter_map(|caps| {
                let city = caps[2].trim();
                if city.is_empty() {
                    None
                } else {
                    Some(format!("{}, {}", &caps[1], city))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_pair() {
        assert_eq!(
            PostalCityExtractor::new().find_all("28080, Madrid"),
            Some(vec!["28080, Madrid".to_string()])
        );
    }

    #[test]
    fn test_all_pairs_in_order() {
        let text = "C/ Mayor 12, 08001,   Barcelona  \nAv. del Puerto 3, 46021, Valencia";
        assert_eq!(
            PostalCityExtractor::new().find_all(text),
            Some(vec!["08001, Barcelona".to_string(), "46021, Valencia".to_string()])
        );
    }

    #[test]
    fn test_city_stops_at_comma() {
        assert_eq!(
            PostalCityExtractor::new().extract("41001, Sevilla, España"),
            Some("41001, Sevilla".to_string())
        );
    }

    #[test]
    fn test_no_pairs() {
        assert_eq!(PostalCityExtractor::new().find_all("Madrid 28080"), None);
        assert_eq!(PostalCityExtractor::new().find_all("1234, Lugo"), None);
    }
}
