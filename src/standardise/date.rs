//! Free-text date parsing.
//!
//! Accepts the shapes that show up on invoices and in annotation exports:
//! `2023-01-31`, `2023/01/31`, `31/01/2023`, `31-01-2023`, `31.01.2023`,
//! `31/January/2023`, `31st Jan 2023`, `January 31, 2023`, `20230131` and ISO
//! timestamps. Ambiguous numeric dates are read day-first; month-first is
//! only used when day-first cannot be a valid date.

use crate::value::Value;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Output format for standardised dates.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Words that may sit between date parts without carrying meaning.
const FILLER: [&str; 4] = ["of", "on", "at", "and"];

/// Tokens of a trailing time-of-day that are dropped before parsing.
const TIME_WORDS: [&str; 5] = ["am", "pm", "utc", "gmt", "z"];

static ISO_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{1,2}-\d{1,2})[t ]\d{1,2}:\d{2}").expect("valid iso datetime regex")
});

/// Standardise a date to `DD-MM-YYYY`.
///
/// Falsy, non-text or unparseable input gives `None`.
pub fn standardise_date(raw: &Value) -> Option<String> {
    if !raw.is_truthy() {
        return None;
    }

    let Some(text) = raw.as_str() else {
        tracing::error!(value = %raw, "date value is not text");
        return None;
    };

    match parse_date(text) {
        Some(date) => Some(date.format(DATE_FORMAT).to_string()),
        None => {
            tracing::error!(value = text, "could not parse date");
            None
        }
    }
}

/// Parse a free-text date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }

    let date_part = strip_time(&lowered);

    let mut month_name: Option<u32> = None;
    let mut numbers: Vec<&str> = Vec::new();

    for token in date_part
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        if token.bytes().all(|b| b.is_ascii_digit()) {
            numbers.push(token);
        } else if let Some(digits) = strip_ordinal(token) {
            numbers.push(digits);
        } else if let Some(month) = month_from_name(token) {
            if month_name.replace(month).is_some() {
                return None;
            }
        } else if !is_weekday(token) && !FILLER.contains(&token) {
            return None;
        }
    }

    let (year, month, day) = match (month_name, numbers.as_slice()) {
        (Some(month), [first, second]) => {
            if is_year(first) && !is_year(second) {
                (year_from(first)?, month, number(second)?)
            } else {
                (year_from(second)?, month, number(first)?)
            }
        }
        (None, [compact]) if compact.len() == 8 => (
            compact[..4].parse().ok()?,
            compact[4..6].parse().ok()?,
            compact[6..].parse().ok()?,
        ),
        (None, [first, second, third]) => {
            if first.len() == 4 {
                (year_from(first)?, number(second)?, number(third)?)
            } else {
                let (a, b) = (number(first)?, number(second)?);
                if b > 12 && a <= 12 {
                    (year_from(third)?, a, b)
                } else {
                    (year_from(third)?, b, a)
                }
            }
        }
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Drop a trailing time of day so only the calendar part is tokenised.
fn strip_time(lowered: &str) -> String {
    if let Some(captures) = ISO_DATETIME.captures(lowered) {
        return captures[1].to_string();
    }

    lowered
        .split_whitespace()
        .filter(|token| !token.contains(':') && !TIME_WORDS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_ordinal(token: &str) -> Option<&str> {
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| token.strip_suffix(suffix))?;
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

fn month_from_name(token: &str) -> Option<u32> {
    if token.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|month| month.starts_with(token))
        .map(|index| index as u32 + 1)
}

fn is_weekday(token: &str) -> bool {
    token.len() >= 3 && WEEKDAYS.iter().any(|day| day.starts_with(token))
}

fn is_year(token: &str) -> bool {
    token.len() >= 3 || number(token).is_some_and(|n| n > 31)
}

fn number(token: &str) -> Option<u32> {
    token.parse().ok()
}

/// Two-digit years are read as 2000-2069 or 1970-1999.
fn year_from(token: &str) -> Option<i32> {
    let year: i32 = token.parse().ok()?;
    Some(match (token.len(), year) {
        (1 | 2, y) if y < 70 => 2000 + y,
        (1 | 2, y) => 1900 + y,
        (_, y) => y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> Option<String> {
        standardise_date(&Value::from(text))
    }

    #[test]
    fn test_standardise_date_valid() {
        assert_eq!(date("2023-01-01"), Some("01-01-2023".to_string()));
        assert_eq!(date("2023/01/01"), Some("01-01-2023".to_string()));
        assert_eq!(date("01/01/2023"), Some("01-01-2023".to_string()));
        assert_eq!(date("01-01-2023"), Some("01-01-2023".to_string()));
        assert_eq!(date("01/January/2023"), Some("01-01-2023".to_string()));
    }

    #[test]
    fn test_standardise_date_invalid() {
        assert_eq!(date("invalid-date"), None);
        assert_eq!(date(""), None);
        assert_eq!(date("31/02/2023"), None);
        assert_eq!(date("January 2023"), None);
        assert_eq!(standardise_date(&Value::Null), None);
        assert_eq!(standardise_date(&Value::from(20230101)), None);
    }

    #[test]
    fn test_day_first_with_month_first_fallback() {
        assert_eq!(date("05/04/2024"), Some("05-04-2024".to_string()));
        assert_eq!(date("04/25/2024"), Some("25-04-2024".to_string()));
        assert_eq!(date("16.04.2024"), Some("16-04-2024".to_string()));
        assert_eq!(date("16/04/24"), Some("16-04-2024".to_string()));
    }

    #[test]
    fn test_month_names_and_ordinals() {
        assert_eq!(date("16th April 2024"), Some("16-04-2024".to_string()));
        assert_eq!(date("April 16, 2024"), Some("16-04-2024".to_string()));
        assert_eq!(date("Tue 16 Apr 2024"), Some("16-04-2024".to_string()));
        assert_eq!(date("2024 Apr 16"), Some("16-04-2024".to_string()));
        assert_eq!(date("1st of Sept 2023"), Some("01-09-2023".to_string()));
    }

    #[test]
    fn test_timestamps_and_compact_dates() {
        assert_eq!(date("2024-04-16T10:30:00"), Some("16-04-2024".to_string()));
        assert_eq!(date("16/04/2024 10:30 am"), Some("16-04-2024".to_string()));
        assert_eq!(date("20240416"), Some("16-04-2024".to_string()));
    }
}
