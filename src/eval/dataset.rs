//! Dataset loading for extraction evaluation.
//!
//! Supports two JSONL row shapes:
//! - the fine-tuning conversation format, where the last `gpt` turn holds the
//!   ground truth as a fenced JSON block
//! - a direct pair format with `ground_truth` and an optional `prediction`
//!
//! Predictions can also come from a separate JSONL file of
//! `{"id": ..., "response": ...}` rows.

use crate::error::{EvalError, Result};
use crate::extract::extract_json_block;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One document to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalItem {
    /// Unique identifier for this item.
    pub id: String,
    /// Source image path, if recorded.
    pub image: Option<String>,
    /// Ground truth record.
    pub ground_truth: Value,
    /// Raw model response, if one has been attached.
    pub prediction: Option<String>,
}

/// A collection of evaluation items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalDataset {
    /// Dataset name.
    pub name: String,
    /// Dataset items.
    pub items: Vec<EvalItem>,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    image: Option<serde_json::Value>,
    #[serde(default)]
    conversations: Option<Vec<Turn>>,
    #[serde(default)]
    ground_truth: Option<serde_json::Value>,
    #[serde(default)]
    prediction: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Turn {
    from: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct PredictionRow {
    id: serde_json::Value,
    response: String,
}

impl EvalDataset {
    /// Create a new empty dataset.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            items: Vec::new(),
        }
    }

    /// Add an item to the dataset.
    pub fn add_item(&mut self, item: EvalItem) {
        self.items.push(item);
    }

    /// Number of items in the dataset.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a subset of items (for quick testing).
    pub fn take(&self, n: usize) -> Self {
        Self {
            name: self.name.clone(),
            items: self.items.iter().take(n).cloned().collect(),
        }
    }

    /// Load a JSONL dataset. The dataset is named after the file stem.
    pub fn load_jsonl(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EvalError::DatasetNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());

        Self::from_jsonl(&name, &content)
    }

    /// Parse JSONL content, one item per non-empty line.
    pub fn from_jsonl(name: &str, content: &str) -> Result<Self> {
        let mut dataset = Self::new(name);

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let raw: RawRow = serde_json::from_str(line)
                .map_err(|e| EvalError::dataset(line_num + 1, e.to_string()))?;
            dataset.add_item(parse_row(line_num + 1, raw)?);
        }

        tracing::debug!(name, items = dataset.len(), "loaded dataset");
        Ok(dataset)
    }

    /// Attach model responses from a JSONL file of `{"id", "response"}` rows.
    ///
    /// Returns the number of items that received a prediction.
    pub fn attach_predictions(&mut self, path: &Path) -> Result<usize> {
        let predictions = load_predictions(path)?;
        Ok(self.apply_predictions(predictions))
    }

    /// Attach responses keyed by item id.
    pub fn apply_predictions(&mut self, mut predictions: HashMap<String, String>) -> usize {
        let mut attached = 0;
        for item in &mut self.items {
            if let Some(response) = predictions.remove(&item.id) {
                item.prediction = Some(response);
                attached += 1;
            }
        }

        if !predictions.is_empty() {
            let mut unknown: Vec<_> = predictions.into_keys().collect();
            unknown.sort();
            tracing::warn!(count = unknown.len(), ids = ?unknown, "predictions for unknown items");
        }
        attached
    }
}

/// Load `{"id", "response"}` rows keyed by id.
pub fn load_predictions(path: &Path) -> Result<HashMap<String, String>> {
    let content = fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
    let mut predictions = HashMap::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let row: PredictionRow = serde_json::from_str(line)
            .map_err(|e| EvalError::dataset(line_num + 1, e.to_string()))?;
        let id = id_text(&row.id)
            .ok_or_else(|| EvalError::dataset(line_num + 1, "prediction id must be a string or number"))?;
        predictions.insert(id, row.response);
    }

    Ok(predictions)
}

fn parse_row(line: usize, raw: RawRow) -> Result<EvalItem> {
    let id = match &raw.id {
        Some(id) => id_text(id)
            .ok_or_else(|| EvalError::dataset(line, "id must be a string or number"))?,
        None => line.to_string(),
    };
    let image = raw.image.as_ref().and_then(image_path);

    let ground_truth = match (raw.conversations, raw.ground_truth) {
        (Some(turns), _) => {
            let answer = turns
                .iter()
                .rev()
                .find(|turn| turn.from == "gpt")
                .ok_or_else(|| EvalError::dataset(line, "conversation has no gpt turn"))?;
            parse_ground_truth(line, &answer.value)?
        }
        (None, Some(serde_json::Value::String(text))) => parse_ground_truth(line, &text)?,
        (None, Some(json)) => Value::from(json),
        (None, None) => {
            return Err(EvalError::dataset(
                line,
                "row has neither conversations nor ground_truth",
            ));
        }
    };

    if ground_truth.as_record().is_none() {
        return Err(EvalError::dataset(
            line,
            format!("ground truth must be an object, got {}", ground_truth.kind()),
        ));
    }

    let prediction = match raw.prediction {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(json) => Some(json.to_string()),
    };

    Ok(EvalItem {
        id,
        image,
        ground_truth,
        prediction,
    })
}

fn parse_ground_truth(line: usize, text: &str) -> Result<Value> {
    serde_json::from_str::<serde_json::Value>(extract_json_block(text))
        .map(Value::from)
        .map_err(|e| EvalError::dataset(line, format!("invalid ground truth JSON: {}", e)))
}

fn id_text(id: &serde_json::Value) -> Option<String> {
    match id {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Image paths may be a single string or a list of strings.
fn image_path(image: &serde_json::Value) -> Option<String> {
    match image {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => items.first().and_then(image_path),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONVERSATION_ROW: &str = r#"{"id": 7, "image": "invoices/7.png", "conversations": [{"from": "human", "value": "<image>\nExtract the invoice"}, {"from": "gpt", "value": "```json\n{\"Total\": \"10.00\"}\n```"}]}"#;

    #[test]
    fn test_dataset_operations() {
        let mut dataset = EvalDataset::new("test");
        assert!(dataset.is_empty());

        for id in ["a", "b", "c"] {
            dataset.add_item(EvalItem {
                id: id.to_string(),
                image: None,
                ground_truth: Value::Record(Default::default()),
                prediction: None,
            });
        }
        assert_eq!(dataset.len(), 3);

        let subset = dataset.take(2);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.name, "test");
    }

    #[test]
    fn test_conversation_row() {
        let dataset = EvalDataset::from_jsonl("train", CONVERSATION_ROW).unwrap();
        let item = &dataset.items[0];
        assert_eq!(item.id, "7");
        assert_eq!(item.image.as_deref(), Some("invoices/7.png"));
        assert_eq!(item.ground_truth.get("Total"), Some(&Value::from("10.00")));
        assert_eq!(item.prediction, None);
    }

    #[test]
    fn test_pair_rows() {
        let content = concat!(
            r#"{"id": "x", "ground_truth": {"Total": "5"}, "prediction": "```json\n{}\n```"}"#,
            "\n\n",
            r#"{"ground_truth": "{\"Total\": \"6\"}", "prediction": {"Total": "6"}}"#,
        );
        let dataset = EvalDataset::from_jsonl("pairs", content).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.items[0].prediction.as_deref(), Some("```json\n{}\n```"));
        assert_eq!(dataset.items[1].id, "3");
        assert_eq!(dataset.items[1].ground_truth.get("Total"), Some(&Value::from("6")));
        assert_eq!(dataset.items[1].prediction.as_deref(), Some(r#"{"Total":"6"}"#));
    }

    #[test]
    fn test_bad_rows_report_line() {
        let err = EvalDataset::from_jsonl("bad", "{\"id\": 1}\n{not json").unwrap_err();
        assert!(matches!(err, EvalError::DatasetParse { line: 1, .. }));

        let err = EvalDataset::from_jsonl("bad", "\n{\"ground_truth\": [1]}").unwrap_err();
        assert!(matches!(err, EvalError::DatasetParse { line: 2, .. }));

        let no_answer = r#"{"conversations": [{"from": "human", "value": "hi"}]}"#;
        assert!(EvalDataset::from_jsonl("bad", no_answer).is_err());
    }

    #[test]
    fn test_load_and_attach_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("invoices.jsonl");
        let pred_path = dir.path().join("responses.jsonl");

        let mut data = fs::File::create(&data_path).unwrap();
        writeln!(data, "{}", CONVERSATION_ROW).unwrap();

        let mut preds = fs::File::create(&pred_path).unwrap();
        writeln!(preds, r#"{{"id": "7", "response": "{{\"Total\": \"10.00\"}}"}}"#).unwrap();
        writeln!(preds, r#"{{"id": 99, "response": "{{}}"}}"#).unwrap();

        let mut dataset = EvalDataset::load_jsonl(&data_path).unwrap();
        assert_eq!(dataset.name, "invoices");

        let attached = dataset.attach_predictions(&pred_path).unwrap();
        assert_eq!(attached, 1);
        assert_eq!(dataset.items[0].prediction.as_deref(), Some(r#"{"Total": "10.00"}"#));
    }

    #[test]
    fn test_missing_dataset() {
        let err = EvalDataset::load_jsonl(Path::new("/nonexistent/data.jsonl")).unwrap_err();
        assert!(matches!(err, EvalError::DatasetNotFound(_)));
    }
}
