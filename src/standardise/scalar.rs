//! Canonical forms for currency amounts, integers, floats and free text.

use crate::value::{Number, Value, format_float};
use regex::Regex;
use std::sync::LazyLock;

static NON_AMOUNT_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d.,]+").expect("valid amount trim regex"));

/// Render an amount as a two-decimal string: `"£1,200"` → `"1200.00"`.
///
/// Everything except digits, `.` and `,` is stripped first, so currency
/// symbols, codes and signs are dropped. Falsy or unparseable input gives
/// `None`.
pub fn standardise_currency(raw: &Value) -> Option<String> {
    if !raw.is_truthy() {
        return None;
    }

    let amount = match raw {
        Value::Number(_) | Value::String(_) => raw
            .scalar_text()
            .and_then(|text| parse_amount(&NON_AMOUNT_CHARS.replace_all(&text, ""))),
        _ => None,
    };

    match amount {
        Some(amount) => Some(format!("{:.2}", amount)),
        None => {
            tracing::error!(value = %raw, "could not standardise currency value");
            None
        }
    }
}

/// Parse the digits left after trimming an amount.
///
/// When both separators appear the last one is the decimal point. A lone
/// comma followed by one or two digits is a decimal comma; any other comma
/// groups thousands.
fn parse_amount(digits: &str) -> Option<f64> {
    let normalized = match (digits.rfind(','), digits.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => digits.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => digits.replace(',', ""),
        (Some(comma), None) => {
            let decimals = digits.len() - comma - 1;
            if digits.matches(',').count() == 1 && (1..=2).contains(&decimals) {
                digits.replace(',', ".")
            } else {
                digits.replace(',', "")
            }
        }
        (None, _) => digits.to_string(),
    };

    normalized.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Render a whole number as plain decimal text.
///
/// Floats are truncated; numeric strings must hold an integer.
pub fn standardise_integer(raw: &Value) -> Option<String> {
    if !raw.is_truthy() {
        return None;
    }

    match raw {
        Value::Number(Number::Int(i)) => Some(i.to_string()),
        Value::Number(Number::Float(f)) if f.is_finite() => Some(integer_text(f.trunc())),
        Value::String(s) => s.trim().parse::<i64>().ok().map(|i| i.to_string()),
        _ => None,
    }
}

/// Integer text for an already-truncated float, beyond the `i64` range too.
fn integer_text(truncated: f64) -> String {
    if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        (truncated as i64).to_string()
    } else {
        format!("{:.0}", truncated)
    }
}

/// Render a number as float text, dropping thousands separators:
/// `"1,250"` → `"1250.0"`.
pub fn standardise_float(raw: &Value) -> Option<String> {
    if !raw.is_truthy() {
        return None;
    }

    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.replace(',', "").trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(format_float(value))
}

/// Lower-case free text.
pub fn standardise_string(raw: &Value) -> Option<String> {
    if !raw.is_truthy() {
        return None;
    }
    raw.scalar_text().map(|text| text.to_lowercase())
}

/// Upper-case an enumerated backend value with underscores for spaces:
/// `"Awaiting Payment"` → `"AWAITING_PAYMENT"`.
pub fn standardise_backend_value(raw: &Value) -> Option<String> {
    if !raw.is_truthy() {
        return None;
    }
    raw.scalar_text()
        .map(|text| text.to_uppercase().replace(' ', "_"))
}
