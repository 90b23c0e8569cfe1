//! Canonical forms for raw extracted field values.
//!
//! Each [`FieldKind`] names one standardisation rule. All rules are total:
//! a value that cannot be standardised becomes Null (or an empty sequence for
//! bank details) and the failure is logged.

pub mod address;
pub mod bank_details;
pub mod date;
pub mod scalar;
pub mod schema;

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use address::{NormalizedAddress, parse_address, standardise_address};
pub use bank_details::{BankDetails, standardise_bank_details};
pub use date::{parse_date, standardise_date};
pub use scalar::{
    standardise_backend_value, standardise_currency, standardise_float, standardise_integer,
    standardise_string,
};
pub use schema::{field_kind_for, flatten_record, standardise_document, standardise_flat};

static NULL: Value = Value::Null;

/// How a field's raw value is standardised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    /// Kept as extracted.
    Raw,
    Integer,
    Float,
    /// Lower-cased text.
    String,
    /// Two-decimal amount.
    Currency,
    /// `DD-MM-YYYY`.
    Date,
    Address,
    BankDetails,
    /// Upper-case enumerated value with underscores.
    Backend,
}

impl FieldKind {
    pub const ALL: [FieldKind; 9] = [
        FieldKind::Raw,
        FieldKind::Integer,
        FieldKind::Float,
        FieldKind::String,
        FieldKind::Currency,
        FieldKind::Date,
        FieldKind::Address,
        FieldKind::BankDetails,
        FieldKind::Backend,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Raw => "raw",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::String => "string",
            FieldKind::Currency => "currency",
            FieldKind::Date => "date",
            FieldKind::Address => "address",
            FieldKind::BankDetails => "bank-details",
            FieldKind::Backend => "backend",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        FieldKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = FieldKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown field kind '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Standardise one value according to `kind`. Blank text is read as Null.
pub fn standardise_value(kind: FieldKind, raw: &Value) -> Value {
    let raw = if raw.is_blank() { &NULL } else { raw };

    match kind {
        FieldKind::Raw => raw.clone(),
        FieldKind::Integer => standardise_integer(raw).into(),
        FieldKind::Float => standardise_float(raw).into(),
        FieldKind::String => standardise_string(raw).into(),
        FieldKind::Currency => standardise_currency(raw).into(),
        FieldKind::Date => standardise_date(raw).into(),
        FieldKind::Address => standardise_address(raw),
        FieldKind::BankDetails => standardise_bank_details(raw),
        FieldKind::Backend => standardise_backend_value(raw).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_from_str() {
        assert_eq!("currency".parse::<FieldKind>(), Ok(FieldKind::Currency));
        assert_eq!("bank_details".parse::<FieldKind>(), Ok(FieldKind::BankDetails));
        assert_eq!(" Date ".parse::<FieldKind>(), Ok(FieldKind::Date));
        assert!("postcode".parse::<FieldKind>().is_err());
        for kind in FieldKind::ALL {
            assert_eq!(kind.to_string().parse::<FieldKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_blank_is_null_for_every_kind() {
        let blank = Value::from("");
        for kind in FieldKind::ALL {
            let expected = match kind {
                FieldKind::BankDetails => Value::Sequence(vec![]),
                _ => Value::Null,
            };
            assert_eq!(standardise_value(kind, &blank), expected, "{}", kind);
        }
    }

    #[test]
    fn test_dispatch() {
        assert_eq!(
            standardise_value(FieldKind::Currency, &Value::from("£100")),
            Value::from("100.00")
        );
        assert_eq!(
            standardise_value(FieldKind::Date, &Value::from("2023/01/01")),
            Value::from("01-01-2023")
        );
        assert_eq!(
            standardise_value(FieldKind::Backend, &Value::from("Paid in full")),
            Value::from("PAID_IN_FULL")
        );
        assert_eq!(standardise_value(FieldKind::Raw, &Value::from(true)), Value::from(true));
        assert_eq!(standardise_value(FieldKind::Currency, &Value::from("n/a")), Value::Null);
    }
}
