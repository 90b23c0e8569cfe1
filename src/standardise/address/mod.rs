//! Address standardisation.
//!
//! Free-text addresses are decomposed by a pipeline of [`AddressParser`]s.
//! The first parser is country-aware and strict; later parsers only fill the
//! slots that are still empty, so a value found earlier is never replaced.
//!
//! ```text
//! "10 Alford Court\nLondon, London N17JW\nUnited Kingdom"
//!   → {"Address Line 1": "10 Alford Court", "Address Line 2": null,
//!      "City": "London", "Postcode": "N17JW", "Country": "GB"}
//! ```

pub mod country;
pub mod structured;
pub mod tokens;

use crate::value::{Record, Value};
use std::sync::LazyLock;

pub use country::country_code;
pub use structured::StructuredParser;
pub use tokens::TokenParser;

/// Output keys of a standardised address, in order.
pub const ADDRESS_KEYS: [&str; 5] = [
    "Address Line 1",
    "Address Line 2",
    "City",
    "Postcode",
    "Country",
];

static PIPELINE: LazyLock<AddressPipeline> = LazyLock::new(AddressPipeline::default);

/// Address slots found by one parser. Every slot is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PartialAddress {
    pub line_1: Option<String>,
    pub line_2: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

impl PartialAddress {
    fn slots_mut(&mut self) -> [&mut Option<String>; 5] {
        [
            &mut self.line_1,
            &mut self.line_2,
            &mut self.city,
            &mut self.postcode,
            &mut self.country,
        ]
    }

    fn slots(&self) -> [&Option<String>; 5] {
        [
            &self.line_1,
            &self.line_2,
            &self.city,
            &self.postcode,
            &self.country,
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.slots().iter().all(|slot| slot.is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.slots().iter().all(|slot| slot.is_some())
    }

    /// Fill empty slots from `other`. Returns how many slots were filled.
    pub fn fill_from(&mut self, mut other: PartialAddress) -> usize {
        let mut filled = 0;
        for (mine, theirs) in self.slots_mut().into_iter().zip(other.slots_mut()) {
            if mine.is_none() && theirs.is_some() {
                *mine = theirs.take();
                filled += 1;
            }
        }
        filled
    }
}

/// One way of decomposing a free-text address.
pub trait AddressParser {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Parse comma-separated address text. `country_hint` is an alpha-2 code
    /// when the country could be identified up front.
    fn parse(&self, text: &str, country_hint: Option<&str>) -> PartialAddress;
}

/// Ordered parsers; earlier parsers take precedence.
pub struct AddressPipeline {
    parsers: Vec<Box<dyn AddressParser + Send + Sync>>,
}

impl Default for AddressPipeline {
    fn default() -> Self {
        Self::new(vec![Box::new(StructuredParser), Box::new(TokenParser)])
    }
}

impl AddressPipeline {
    pub fn new(parsers: Vec<Box<dyn AddressParser + Send + Sync>>) -> Self {
        Self { parsers }
    }

    /// Run the parsers in order until every slot is filled.
    pub fn parse(&self, text: &str, country_hint: Option<&str>) -> PartialAddress {
        let mut address = PartialAddress::default();
        for parser in &self.parsers {
            if address.is_complete() {
                break;
            }
            let filled = address.fill_from(parser.parse(text, country_hint));
            tracing::debug!(parser = parser.name(), filled, "address parser finished");
        }
        address
    }
}

/// A standardised address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAddress {
    pub line_1: Option<String>,
    pub line_2: Option<String>,
    pub city: Option<String>,
    /// Upper-cased with all whitespace removed.
    pub postcode: Option<String>,
    pub country: Option<String>,
}

impl NormalizedAddress {
    fn from_partial(partial: PartialAddress) -> Self {
        let clean = |slot: Option<String>| {
            slot.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            line_1: clean(partial.line_1),
            line_2: clean(partial.line_2),
            city: clean(partial.city),
            postcode: clean(partial.postcode).map(|p| {
                p.chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .to_uppercase()
            }),
            country: clean(partial.country),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.line_1.is_none()
            && self.line_2.is_none()
            && self.city.is_none()
            && self.postcode.is_none()
            && self.country.is_none()
    }

    pub fn to_record(&self) -> Record {
        let slots = [
            &self.line_1,
            &self.line_2,
            &self.city,
            &self.postcode,
            &self.country,
        ];
        ADDRESS_KEYS
            .into_iter()
            .zip(slots)
            .map(|(key, slot)| (key.to_string(), Value::from(slot.clone())))
            .collect()
    }
}

/// Split on commas into trimmed, non-empty components.
pub(crate) fn split_components(text: &str) -> Vec<&str> {
    text.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

/// Resolve the last comma-separated component as a country.
pub fn extract_country_hint(text: &str) -> Option<&'static str> {
    let last = text.rsplit(',').next()?.trim();
    let code = country_code(last);
    if code.is_none() {
        tracing::debug!(component = last, "no country found in address");
    }
    code
}

/// Parse a free-text address. `None` when nothing could be recovered.
pub fn parse_address(text: &str) -> Option<NormalizedAddress> {
    if text.trim().is_empty() {
        return None;
    }
    let text = text.replace("\r\n", ", ").replace('\n', ", ");

    let hint = extract_country_hint(&text);
    let mut partial = PIPELINE.parse(&text, hint);
    if let Some(code) = hint {
        partial.country = Some(code.to_string());
    }

    let address = NormalizedAddress::from_partial(partial);
    (!address.is_empty()).then_some(address)
}

/// Standardise an address value.
///
/// Null stays Null and a record is returned unchanged, so standardising twice
/// gives the same result. Text is parsed into the five address slots; text
/// with no recoverable slot and any other value give Null.
pub fn standardise_address(raw: &Value) -> Value {
    match raw {
        Value::Null => Value::Null,
        Value::Record(_) => raw.clone(),
        Value::String(text) => match parse_address(text) {
            Some(address) => Value::Record(address.to_record()),
            None => {
                tracing::error!(value = text.as_str(), "could not parse address");
                Value::Null
            }
        },
        other => {
            tracing::error!(value = %other, "address value is not text");
            Value::Null
        }
    }
}
