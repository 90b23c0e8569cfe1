//! Bank details standardisation.
//!
//! The canonical form is a sequence of account records with a fixed key set.
//! Free text such as `"Barclays, Sort code: 20-00-00, Account Number: 1234"`
//! is read with three independent patterns; anything they miss stays Null.

use crate::value::{Record, Value};
use regex::Regex;
use std::sync::LazyLock;

/// Output keys of one bank account record, in order.
pub const BANK_DETAIL_KEYS: [&str; 8] = [
    "Company Name",
    "Account Number",
    "Sort Code",
    "Bank Name",
    "Bank Number",
    "IBAN",
    "SWIFT Code",
    "Account Type",
];

static BANK_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^,]+),").expect("valid bank name regex"));

static SORT_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)sort code:\s*(\d{2}-\d{2}-\d{2})").expect("valid sort code regex")
});

static ACCOUNT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)account number:\s*(\d+)").expect("valid account number regex")
});

/// One bank account.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BankDetails {
    pub company_name: Option<String>,
    pub account_number: Option<String>,
    pub sort_code: Option<String>,
    pub bank_name: Option<String>,
    pub bank_number: Option<String>,
    pub iban: Option<String>,
    pub swift_code: Option<String>,
    pub account_type: Option<String>,
}

impl BankDetails {
    /// Read the bank name, sort code and account number from free text.
    pub fn parse(text: &str) -> Self {
        let capture = |pattern: &Regex| {
            pattern
                .captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            account_number: capture(&ACCOUNT_NUMBER),
            sort_code: capture(&SORT_CODE),
            bank_name: capture(&BANK_NAME),
            ..Self::default()
        }
    }

    pub fn to_record(&self) -> Record {
        let slots = [
            &self.company_name,
            &self.account_number,
            &self.sort_code,
            &self.bank_name,
            &self.bank_number,
            &self.iban,
            &self.swift_code,
            &self.account_type,
        ];
        BANK_DETAIL_KEYS
            .into_iter()
            .zip(slots)
            .map(|(key, slot)| (key.to_string(), Value::from(slot.clone())))
            .collect()
    }
}

/// Standardise bank details into a sequence of account records.
///
/// Null gives an empty sequence. A sequence is returned unchanged (with a
/// warning when it holds more than one account) and a single record is
/// wrapped in a one-entry sequence. Text is parsed into exactly one record.
pub fn standardise_bank_details(raw: &Value) -> Value {
    match raw {
        Value::Null => Value::Sequence(Vec::new()),
        Value::Sequence(accounts) => {
            if accounts.len() > 1 {
                tracing::warn!(
                    accounts = accounts.len(),
                    value = %raw,
                    "multiple bank details found"
                );
            }
            raw.clone()
        }
        Value::Record(_) => Value::Sequence(vec![raw.clone()]),
        Value::String(text) => Value::Sequence(vec![Value::Record(
            BankDetails::parse(text).to_record(),
        )]),
        other => {
            tracing::warn!(value = %other, "bank details are not text or records");
            Value::Sequence(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_free_text() {
        let value = standardise_bank_details(&Value::from(
            "Bank Name, Sort code: 12-34-56, Account Number: 12345678, Payment reference: ref123",
        ));
        let accounts = value.as_sequence().unwrap();
        assert_eq!(accounts.len(), 1);

        let account = &accounts[0];
        assert_eq!(account.get("Bank Name").and_then(Value::as_str), Some("Bank Name"));
        assert_eq!(account.get("Sort Code").and_then(Value::as_str), Some("12-34-56"));
        assert_eq!(
            account.get("Account Number").and_then(Value::as_str),
            Some("12345678")
        );
        for key in ["Company Name", "Bank Number", "IBAN", "SWIFT Code", "Account Type"] {
            assert_eq!(account.get(key), Some(&Value::Null), "{}", key);
        }
    }

    #[test]
    fn test_unmatched_text_gives_one_empty_record() {
        let value = standardise_bank_details(&Value::from("invalid"));
        let accounts = value.as_sequence().unwrap();
        assert_eq!(accounts.len(), 1);
        let record = accounts[0].as_record().unwrap();
        assert_eq!(record.len(), BANK_DETAIL_KEYS.len());
        assert!(record.iter().all(|(_, v)| v.is_null()));
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let details = BankDetails::parse("HSBC, SORT CODE: 40-11-62, account number: 0042");
        assert_eq!(details.bank_name.as_deref(), Some("HSBC"));
        assert_eq!(details.sort_code.as_deref(), Some("40-11-62"));
        assert_eq!(details.account_number.as_deref(), Some("0042"));
    }

    #[test]
    fn test_null_sequence_and_record_inputs() {
        assert_eq!(standardise_bank_details(&Value::Null), Value::Sequence(vec![]));

        let accounts = Value::Sequence(vec![
            Record::from_iter([("IBAN".to_string(), Value::from("GB00"))]).into(),
            Record::from_iter([("IBAN".to_string(), Value::from("GB01"))]).into(),
        ]);
        assert_eq!(standardise_bank_details(&accounts), accounts);

        let single: Value = Record::from_iter([("IBAN".to_string(), Value::from("GB00"))]).into();
        assert_eq!(
            standardise_bank_details(&single),
            Value::Sequence(vec![single.clone()])
        );
        assert_eq!(standardise_bank_details(&Value::from(7)), Value::Sequence(vec![]));
    }
}
