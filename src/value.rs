//! Dynamic values exchanged between extractors, the standardisation layer and
//! the scorer.
//!
//! A document is a [`Record`]: an insertion-ordered map from field name to
//! [`Value`]. Values are tagged, so the scorer can dispatch on the shape of the
//! ground truth with an exhaustive `match`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A JSON number that remembers whether it was written as an integer.
///
/// Equality is numeric, so `10` and `10.0` compare equal.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// The value as a float.
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Whether the number is zero.
    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

/// Render a float the way the annotation exports write them: integral values
/// keep a trailing `.0`, very large or very small magnitudes use an exponent.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let rendered = format!("{:e}", value);
        if let Some((mantissa, exponent)) = rendered.split_once('e') {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            return format!("{}e{}{:0>2}", mantissa, sign, digits);
        }
        return rendered;
    }

    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// An insertion-ordered map of field names to values.
///
/// Equality ignores key order, matching how two documents with the same
/// fields are considered the same document. Use `shift_remove` to drop a
/// field without reordering the rest.
pub type Record = IndexMap<String, Value>;

/// A value in an extracted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Record(Record),
}

impl Value {
    /// Check if the value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `Null` or the empty string: ground truth that carries no signal.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Truthiness used by the standardisation functions.
    ///
    /// `Null`, `false`, zero, the empty string and empty containers are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !n.is_zero(),
            Value::String(s) => !s.is_empty(),
            Value::Sequence(items) => !items.is_empty(),
            Value::Record(record) => !record.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a field when the value is a record.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_record().and_then(|record| record.get(key))
    }

    /// Short name of the value's tag, for log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Record(_) => "record",
        }
    }

    /// Scalar rendered as plain text (strings unquoted).
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            composite => write!(f, "{}", serde_json::Value::from(composite.clone())),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Number(Number::Int(i)),
                None => n
                    .as_f64()
                    .map(|f| Value::Number(Number::Float(f)))
                    .unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Record(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(Number::Int(i)) => serde_json::Value::Number(i.into()),
            Value::Number(Number::Float(f)) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Record(record) => serde_json::Value::Object(
                record
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(Number::Int(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Number(Number::Int(i64::from(i)))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_equality_is_numeric() {
        assert_eq!(Value::from(10), Value::from(10.0));
        assert_ne!(Value::from(1), Value::from(true));
        assert_ne!(Value::from("1"), Value::from(1));
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let value = Value::from(json!({"Total": 10, "VAT": 1, "Description": "x"}));
        let keys: Vec<_> = value.as_record().unwrap().keys().collect();
        assert_eq!(keys, vec!["Total", "VAT", "Description"]);
    }

    #[test]
    fn test_record_equality_ignores_order() {
        let a = Value::from(json!({"Total": 10, "VAT": 1}));
        let b = Value::from(json!({"VAT": 1, "Total": 10}));
        assert_eq!(a, b);
    }

    #[test]
    fn test_insert_and_remove_keep_order() {
        let mut record = Record::new();
        record.insert("a".to_string(), Value::from(1));
        record.insert("b".to_string(), Value::from(2));
        record.insert("c".to_string(), Value::from(3));
        assert_eq!(record.insert("a".to_string(), Value::from(4)), Some(Value::from(1)));
        assert_eq!(record.get("a"), Some(&Value::from(4)));

        assert_eq!(record.shift_remove("b"), Some(Value::from(2)));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::from(0.5).is_truthy());
    }

    #[test]
    fn test_serde_through_json() {
        let value: Value = serde_json::from_str(r#"{"a": [1, 2.5, null, "x", true]}"#).unwrap();
        let items = value.get("a").and_then(Value::as_sequence).unwrap();
        assert_eq!(items[0], Value::Number(Number::Int(1)));
        assert_eq!(items[1], Value::Number(Number::Float(2.5)));
        assert!(items[2].is_null());

        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"a":[1,2.5,null,"x",true]}"#);
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(1234.5), "1234.5");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e-5), "1.5e-05");
    }
}
