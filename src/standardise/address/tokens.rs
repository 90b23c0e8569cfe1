//! Fallback tokenizer in the style of libpostal.
//!
//! Labels each piece of a lower-cased address with one of a fixed set of
//! component tags. It never needs a country and tolerates addresses without a
//! postcode, so it recovers partial signal the structured parser misses.

use super::country::country_code;
use super::structured::OCCUPANCY;
use super::{AddressParser, PartialAddress, split_components};
use regex::Regex;
use std::sync::LazyLock;

/// Postcode shapes accepted without knowing the country, most specific first.
static POSTCODES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r"\b([a-z]{1,2}\d[a-z\d]?\s*\d[a-z]{2})\b",
        r"\b([a-z]\d[a-z]\s?\d[a-z]\d)\b",
        r"\b(\d{5}-\d{4})\b",
        r"\b(\d{4,6})\b",
    ]
    .map(|pattern| Regex::new(pattern).expect("valid postcode regex"))
});

/// Component tags produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    House,
    HouseNumber,
    Road,
    Unit,
    Level,
    Staircase,
    City,
    Postcode,
    Country,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::House => "house",
            Label::HouseNumber => "house_number",
            Label::Road => "road",
            Label::Unit => "unit",
            Label::Level => "level",
            Label::Staircase => "staircase",
            Label::City => "city",
            Label::Postcode => "postcode",
            Label::Country => "country",
        }
    }
}

/// Labelled address pieces; the first piece for each label wins.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tokens(Vec<(Label, String)>);

impl Tokens {
    fn push(&mut self, label: Label, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() && self.get(label).is_none() {
            self.0.push((label, value));
        }
    }

    pub fn get(&self, label: Label) -> Option<&str> {
        self.0
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Label, &str)> {
        self.0.iter().map(|(l, v)| (*l, v.as_str()))
    }
}

/// Split an address into labelled tokens.
pub fn tokenize(text: &str) -> Tokens {
    let lowered = text.to_lowercase();
    let mut components = split_components(&lowered);
    let mut tokens = Tokens::default();

    if let Some(&last) = components.last() {
        if country_code(last).is_some() {
            tokens.push(Label::Country, last);
            components.pop();
        }
    }

    if let Some((index, postcode, rest)) = find_postcode(&components) {
        tokens.push(Label::Postcode, postcode);
        if rest.is_empty() {
            components.remove(index);
        } else {
            tokens.push(Label::City, rest);
            components.truncate(index);
        }
    }

    for component in &components {
        if OCCUPANCY.is_match(component) {
            let label = if component.contains("floor") || component.starts_with("level") {
                Label::Level
            } else if component.starts_with("stair") {
                Label::Staircase
            } else {
                Label::Unit
            };
            tokens.push(label, *component);
            continue;
        }

        match component.split_once(char::is_whitespace) {
            Some((number, road))
                if number.starts_with(|c: char| c.is_ascii_digit())
                    && tokens.get(Label::HouseNumber).is_none() =>
            {
                tokens.push(Label::HouseNumber, number);
                tokens.push(Label::Road, road.trim());
            }
            _ if tokens.get(Label::Road).is_none() && tokens.get(Label::House).is_none() => {
                tokens.push(Label::House, *component);
            }
            _ => tokens.push(Label::City, *component),
        }
    }

    tokens
}

/// Find the last component holding a postcode, returning its index, the
/// postcode and the component text left around it.
fn find_postcode(components: &[&str]) -> Option<(usize, String, String)> {
    components.iter().enumerate().rev().find_map(|(i, component)| {
        if i == 0 && components.len() > 1 {
            return None;
        }
        POSTCODES.iter().find_map(|pattern| {
            let found = pattern.captures(component)?.get(1)?;
            let rest = format!(
                "{} {}",
                &component[..found.start()],
                &component[found.end()..]
            );
            Some((i, found.as_str().to_string(), rest.trim().to_string()))
        })
    })
}

/// Fallback address parser backed by [`tokenize`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenParser;

impl AddressParser for TokenParser {
    fn name(&self) -> &'static str {
        "tokens"
    }

    fn parse(&self, text: &str, _country_hint: Option<&str>) -> PartialAddress {
        let tokens = tokenize(text);

        let line_1 = match (
            tokens.get(Label::House),
            tokens.get(Label::HouseNumber),
            tokens.get(Label::Road),
        ) {
            (Some(house), _, _) => Some(house.to_string()),
            (None, Some(number), Some(road)) => Some(format!("{}, {}", number, road)),
            (None, Some(number), None) => Some(number.to_string()),
            (None, None, _) => None,
        };

        let line_2 = tokens
            .get(Label::Unit)
            .or_else(|| tokens.get(Label::Level))
            .or_else(|| tokens.get(Label::Staircase));

        PartialAddress {
            line_1,
            line_2: line_2.map(str::to_string),
            city: tokens.get(Label::City).map(str::to_string),
            postcode: tokens.get(Label::Postcode).map(str::to_string),
            country: tokens.get(Label::Country).map(str::to_string),
        }
    }
}
