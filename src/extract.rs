//! Reading model responses into records.
//!
//! Models are prompted to answer with a fenced JSON block, but responses
//! often carry a preamble, a bare fence or no fence at all.

use crate::value::{Record, Value};

/// Find the JSON text inside a model response.
///
/// Looks for a ```` ```json ```` fence first, then a bare ```` ``` ```` fence,
/// then the outermost `{...}` span. Returns the trimmed response when none
/// is found.
pub fn extract_json_block(response: &str) -> &str {
    let response = response.trim();

    if let Some(start) = response.find("```json") {
        let body = &response[start + "```json".len()..];
        return fenced_body(body);
    }

    if let Some(start) = response.find("```") {
        let body = &response[start + 3..];
        // Skip an info string such as `JSON` or `javascript` on the fence line.
        let body = match body.find('\n') {
            Some(newline) if !body[..newline].contains('{') => &body[newline + 1..],
            _ => body,
        };
        return fenced_body(body);
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end > start {
                return &response[start..=end];
            }
        }
    }

    response
}

fn fenced_body(body: &str) -> &str {
    let end = body.find("```").unwrap_or(body.len());
    body[..end].trim()
}

/// Parse a model response into a record.
///
/// Malformed JSON or a JSON value that is not an object is logged and read as
/// the empty record, which scores as a miss on every field.
pub fn parse_prediction(response: &str) -> Record {
    let block = extract_json_block(response);

    match serde_json::from_str::<serde_json::Value>(block) {
        Ok(json) => match Value::from(json) {
            Value::Record(record) => record,
            other => {
                tracing::error!(kind = other.kind(), "prediction is not a JSON object");
                Record::new()
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "failed to parse prediction");
            Record::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fenced_json() {
        let response = "```json\n{\"Total\": \"10.00\"}\n```";
        assert_eq!(extract_json_block(response), "{\"Total\": \"10.00\"}");

        let with_preamble = "Here is the data:\n```json\n{\"Total\": 1}\n```\nDone.";
        assert_eq!(extract_json_block(with_preamble), "{\"Total\": 1}");
    }

    #[test]
    fn test_extract_bare_fence_and_span() {
        assert_eq!(extract_json_block("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(extract_json_block("```JSON\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(
            extract_json_block("The answer is {\"a\": {\"b\": 2}} as requested"),
            "{\"a\": {\"b\": 2}}"
        );
        assert_eq!(extract_json_block("  no json  "), "no json");
    }

    #[test]
    fn test_parse_prediction() {
        let record = parse_prediction("```json\n{\"Total\": \"10.00\", \"Line Items\": []}\n```");
        assert_eq!(record.get("Total"), Some(&Value::from("10.00")));
        assert_eq!(record.get("Line Items"), Some(&Value::Sequence(vec![])));
    }

    #[test]
    fn test_unparseable_prediction_is_empty() {
        assert!(parse_prediction("```json\n{\"Total\": \n```").is_empty());
        assert!(parse_prediction("I could not read this invoice").is_empty());
        assert!(parse_prediction("```json\n[1, 2]\n```").is_empty());
        assert!(parse_prediction("").is_empty());
    }
}
