//! Country-aware parser for complete postal addresses.
//!
//! Only runs when the country is known and has a postcode grammar here
//! (GB, US, CA). The address must contain a postcode in that grammar; the
//! street, occupancy and city are then read from the comma-separated
//! components in front of it.

use super::{AddressParser, PartialAddress, split_components};
use regex::Regex;
use std::sync::LazyLock;

static GB_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([A-Z]{1,2}\d[A-Z\d]?\s*\d[A-Z]{2})\b").expect("valid gb postcode regex")
});

static US_ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{5}(?:-\d{4})?)\b").expect("valid us zip regex"));

static CA_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([A-Z]\d[A-Z]\s?\d[A-Z]\d)\b").expect("valid ca postcode regex")
});

/// Two-letter region codes that sit in front of a US or CA postcode.
static REGION_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\b[A-Z]{2}\.?$").expect("valid region code regex"));

pub(super) static OCCUPANCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:unit|apt|apartment|suite|ste|flat|floor|fl|level|room|rm|building|bldg|block)\b\.?|#)\s*\S*|^\d+(?:st|nd|rd|th)\s+floor\b",
    )
    .expect("valid occupancy regex")
});

/// Parser for addresses in a country with a known postcode grammar.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredParser;

impl StructuredParser {
    fn postcode_pattern(country: &str) -> Option<&'static Regex> {
        match country {
            "GB" => Some(&GB_POSTCODE),
            "US" => Some(&US_ZIP),
            "CA" => Some(&CA_POSTCODE),
            _ => None,
        }
    }
}

impl AddressParser for StructuredParser {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn parse(&self, text: &str, country_hint: Option<&str>) -> PartialAddress {
        let Some(country) = country_hint else {
            return PartialAddress::default();
        };
        let Some(pattern) = Self::postcode_pattern(country) else {
            return PartialAddress::default();
        };

        let mut components = split_components(text);
        if components
            .last()
            .is_some_and(|last| super::country::country_code(last) == Some(country))
        {
            components.pop();
        }

        let Some((postcode_index, postcode, prefix)) =
            components.iter().enumerate().rev().find_map(|(i, component)| {
                let found = pattern.captures(component)?.get(1)?;
                let prefix = component[..found.start()].trim().trim_end_matches(',');
                Some((i, found.as_str().to_string(), prefix.to_string()))
            })
        else {
            return PartialAddress::default();
        };

        let before = &components[..postcode_index];
        let occupancy = before.iter().find(|c| OCCUPANCY.is_match(c));
        let street_index = before
            .iter()
            .position(|c| starts_with_number(c))
            .or_else(|| before.iter().position(|c| !OCCUPANCY.is_match(c)));

        let city = street_index
            .and_then(|street| {
                before[street + 1..]
                    .iter()
                    .rev()
                    .find(|c| !OCCUPANCY.is_match(c))
            })
            .map(|c| c.to_string())
            .or_else(|| {
                let prefix = if country == "GB" {
                    prefix
                } else {
                    REGION_CODE.replace(&prefix, "").trim().to_string()
                };
                (!prefix.is_empty()).then_some(prefix)
            });

        PartialAddress {
            line_1: street_index.map(|i| before[i].to_string()),
            line_2: occupancy.map(|c| c.to_string()),
            city,
            postcode: Some(postcode),
            country: Some(country.to_string()),
        }
    }
}

fn starts_with_number(component: &str) -> bool {
    component
        .split_whitespace()
        .next()
        .is_some_and(|first| first.starts_with(|c: char| c.is_ascii_digit()))
        && !OCCUPANCY.is_match(component)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, country: &str) -> PartialAddress {
        StructuredParser.parse(text, Some(country))
    }

    #[test]
    fn test_gb_address() {
        let parsed = parse(
            "10 Alford Court, London, London N17JW, United Kingdom",
            "GB",
        );
        assert_eq!(parsed.line_1.as_deref(), Some("10 Alford Court"));
        assert_eq!(parsed.line_2, None);
        assert_eq!(parsed.city.as_deref(), Some("London"));
        assert_eq!(parsed.postcode.as_deref(), Some("N17JW"));
        assert_eq!(parsed.country.as_deref(), Some("GB"));
    }

    #[test]
    fn test_gb_occupancy_and_postcode_only_component() {
        let parsed = parse("Unit 4, 22 Mill Lane, Leeds, LS1 4DY, GB", "GB");
        assert_eq!(parsed.line_1.as_deref(), Some("22 Mill Lane"));
        assert_eq!(parsed.line_2.as_deref(), Some("Unit 4"));
        assert_eq!(parsed.city.as_deref(), Some("Leeds"));
        assert_eq!(parsed.postcode.as_deref(), Some("LS1 4DY"));
    }

    #[test]
    fn test_us_address_drops_state_code() {
        let parsed = parse("123 Main St, Springfield IL 62704, USA", "US");
        assert_eq!(parsed.line_1.as_deref(), Some("123 Main St"));
        assert_eq!(parsed.city.as_deref(), Some("Springfield"));
        assert_eq!(parsed.postcode.as_deref(), Some("62704"));
        assert_eq!(parsed.country.as_deref(), Some("US"));
    }

    #[test]
    fn test_requires_postcode_and_known_country() {
        assert!(parse("10 Alford Court, London, United Kingdom", "GB").is_empty());
        assert!(parse("5 Rue de Rivoli, 75001 Paris, France", "FR").is_empty());
        assert!(StructuredParser.parse("10 Alford Court, London N17JW", None).is_empty());
    }
}
