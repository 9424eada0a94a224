use log::trace;
use regex::Regex;

/// Parses free-text price and area fields into canonical numeric units.
///
/// Prices come back in rupees (1 Lakh = 100,000; 1 Crore = 10,000,000),
/// areas in Marla (1 Kanal = 20 Marla). Unparseable input yields None so
/// the cleaning pipeline can impute it, never an error.
pub struct UnitParser {
    strip: Regex,
}

impl UnitParser {
    pub fn new() -> Self {
        UnitParser {
            // Everything except digits and the decimal point is dropped
            // before the numeric remainder is parsed.
            strip: Regex::new(r"[^0-9.]").expect("static pattern compiles"),
        }
    }

    pub fn parse_price(&self, text: &str) -> Option<f64> {
        let normalized = text.to_lowercase();
        let normalized = normalized.trim();

        let value = if normalized.contains("lakh") {
            self.numeric_fragment(normalized)? * 100_000.0
        } else if normalized.contains("thousand") {
            self.numeric_fragment(normalized)? * 1_000.0
        } else if normalized.contains("crore") {
            self.numeric_fragment(normalized)? * 10_000_000.0
        } else {
            self.numeric_fragment(normalized)?
        };

        Some(value)
    }

    pub fn parse_area(&self, text: &str) -> Option<f64> {
        let normalized = text.to_lowercase();
        let normalized = normalized.trim();

        let value = if normalized.contains("kanal") {
            self.numeric_fragment(normalized)? * 20.0
        } else if normalized.contains("marla") {
            self.numeric_fragment(normalized)?
        } else {
            self.numeric_fragment(normalized)?
        };

        Some(value)
    }

    // Strips the text down to digits and the decimal point, then parses the
    // remainder. "Rs. 2.5 Lakh/month" leaves "2.5" behind.
    fn numeric_fragment(&self, text: &str) -> Option<f64> {
        let fragment = self.strip.replace_all(text, "");
        match fragment.parse::<f64>() {
            Ok(value) => Some(value),
            Err(_) => {
                trace!("no numeric fragment in '{}'", text);
                None
            }
        }
    }
}

impl Default for UnitParser {
    fn default() -> Self {
        UnitParser::new()
    }
}

pub fn parse_price(text: &str) -> Option<f64> {
    UnitParser::new().parse_price(text)
}

pub fn parse_area(text: &str) -> Option<f64> {
    UnitParser::new().parse_area(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_scale_words() {
        assert_eq!(parse_price("2.5 Lakh"), Some(250_000.0));
        assert_eq!(parse_price("75 Thousand"), Some(75_000.0));
        assert_eq!(parse_price("1 Crore"), Some(10_000_000.0));
    }

    #[test]
    fn price_without_unit_word_parses_directly() {
        assert_eq!(parse_price("45000"), Some(45_000.0));
        assert_eq!(parse_price(" 45,000 "), Some(45_000.0));
    }

    #[test]
    fn price_unparseable_is_missing_not_error() {
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("price on request"), None);
    }

    #[test]
    fn price_mixed_punctuation_extracts_remainder() {
        assert_eq!(parse_price("Rs. 2.5 Lakh/month!"), Some(250_000.0));
        assert_eq!(parse_price("PKR 75 thousand (negotiable)"), Some(75_000.0));
    }

    #[test]
    fn price_multiple_decimal_points_is_missing() {
        // strips to "1.2.3", which is not a number
        assert_eq!(parse_price("v1.2.3 Lakh"), None);
    }

    #[test]
    fn area_units() {
        assert_eq!(parse_area("1 Kanal"), Some(20.0));
        assert_eq!(parse_area("5 Marla"), Some(5.0));
        assert_eq!(parse_area("2.5 kanal"), Some(50.0));
        assert_eq!(parse_area("7"), Some(7.0));
    }

    #[test]
    fn area_unparseable_is_missing() {
        assert_eq!(parse_area("unknown"), None);
    }

    #[test]
    fn case_insensitive_unit_words() {
        assert_eq!(parse_price("3 LAKH"), Some(300_000.0));
        assert_eq!(parse_area("1 KANAL"), Some(20.0));
    }
}
