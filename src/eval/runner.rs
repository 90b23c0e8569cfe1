//! Evaluation runner scoring model predictions against ground truth.

use super::dataset::{EvalDataset, EvalItem};
use crate::config::ScoringConfig;
use crate::error::{EvalError, Result};
use crate::extract::parse_prediction;
use crate::metrics::{ScoreAccumulator, ScoreReport};
use crate::standardise::standardise_document;
use crate::value::{Record, Value};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Results for a single item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResult {
    /// Item ID.
    pub item_id: String,
    /// Source image, if recorded.
    pub image: Option<String>,
    /// Whether a model response was available.
    pub has_prediction: bool,
    /// Matched leaves.
    pub true_positive: usize,
    /// Scored leaves.
    pub count: usize,
    /// `true_positive / count`.
    pub accuracy: f64,
}

/// Aggregated evaluation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResults {
    /// Dataset name.
    pub dataset_name: String,
    /// Total items evaluated.
    pub total_items: usize,
    /// Items that had a model response.
    pub items_with_prediction: usize,
    /// Leaf counts over the whole dataset.
    pub report: ScoreReport,
    /// Mean of the per-item accuracies.
    pub mean_item_accuracy: f64,
    /// Individual item results.
    pub item_results: Vec<ItemResult>,
    /// Total evaluation time (seconds).
    pub total_time_secs: f64,
}

impl EvaluationResults {
    /// Create empty results.
    pub fn new(dataset_name: &str) -> Self {
        Self {
            dataset_name: dataset_name.to_string(),
            total_items: 0,
            items_with_prediction: 0,
            report: ScoreAccumulator::new().report(),
            mean_item_accuracy: 0.0,
            item_results: Vec::new(),
            total_time_secs: 0.0,
        }
    }

    /// Calculate summary statistics from item results.
    pub fn calculate_summary(&mut self) {
        self.total_items = self.item_results.len();
        self.items_with_prediction = self
            .item_results
            .iter()
            .filter(|r| r.has_prediction)
            .count();

        if !self.item_results.is_empty() {
            self.mean_item_accuracy = self.item_results.iter().map(|r| r.accuracy).sum::<f64>()
                / self.item_results.len() as f64;
        }
    }

    /// Print summary to stdout.
    pub fn print_summary(&self) {
        println!("\n========== Evaluation Results ==========");
        println!("Dataset: {}", self.dataset_name);
        println!(
            "Total items: {} ({} with predictions)",
            self.total_items, self.items_with_prediction
        );
        println!("----------------------------------------");
        println!(
            "Matched fields: {}/{}",
            self.report.true_positive, self.report.count
        );
        println!("Accuracy:           {:.2}%", self.report.accuracy * 100.0);
        println!("Mean item accuracy: {:.2}%", self.mean_item_accuracy * 100.0);

        if !self.report.fields.is_empty() {
            println!("----------------------------------------");
            let mut fields: Vec<_> = self.report.fields.iter().collect();
            fields.sort_by(|a, b| {
                a.1.accuracy()
                    .total_cmp(&b.1.accuracy())
                    .then_with(|| a.0.cmp(b.0))
            });
            for (path, tally) in fields {
                println!(
                    "{:<40} {:>5}/{:<5} {:>6.1}%",
                    path,
                    tally.true_positive,
                    tally.count,
                    tally.accuracy() * 100.0
                );
            }
        }

        println!("----------------------------------------");
        println!("Total time: {:.1}s", self.total_time_secs);
        println!("========================================\n");
    }

    /// Save to a JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| EvalError::io(path, e))?;
        Ok(())
    }
}

/// Evaluation runner.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: ScoringConfig,
    max_items: Option<usize>,
}

impl Evaluator {
    /// Create a new evaluation runner.
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            max_items: None,
        }
    }

    /// Limit the number of items evaluated.
    pub fn with_max_items(mut self, max_items: Option<usize>) -> Self {
        self.max_items = max_items;
        self
    }

    /// Run the evaluation on a dataset.
    pub fn run(&self, dataset: &EvalDataset) -> EvaluationResults {
        let start_time = Instant::now();
        let mut results = EvaluationResults::new(&dataset.name);
        let mut total = ScoreAccumulator::new();

        let items = dataset
            .items
            .iter()
            .take(self.max_items.unwrap_or(usize::MAX));

        for item in items {
            let (item_result, accumulator) = self.score_item(item);
            tracing::debug!(
                id = %item_result.item_id,
                true_positive = item_result.true_positive,
                count = item_result.count,
                "scored item"
            );
            total.merge(&accumulator);
            results.item_results.push(item_result);
        }

        results.report = total.report();
        results.total_time_secs = start_time.elapsed().as_secs_f64();
        results.calculate_summary();

        tracing::info!(
            dataset = %results.dataset_name,
            items = results.total_items,
            accuracy = results.report.accuracy,
            "evaluation finished"
        );
        results
    }

    /// Score one item with its own accumulator.
    pub fn score_item(&self, item: &EvalItem) -> (ItemResult, ScoreAccumulator) {
        let truth = item.ground_truth.as_record().cloned().unwrap_or_default();
        let prediction = match item.prediction.as_deref() {
            Some(response) => parse_prediction(response),
            None => {
                tracing::warn!(id = %item.id, "no prediction, scoring against an empty record");
                Record::new()
            }
        };

        let accumulator = self.compare(truth, prediction);
        let result = ItemResult {
            item_id: item.id.clone(),
            image: item.image.clone(),
            has_prediction: item.prediction.is_some(),
            true_positive: accumulator.true_positive(),
            count: accumulator.count(),
            accuracy: accumulator.accuracy(),
        };
        (result, accumulator)
    }

    /// Prepare and compare one ground-truth/prediction pair.
    pub fn compare(&self, truth: Record, prediction: Record) -> ScoreAccumulator {
        let truth = self.prepare(truth);
        let prediction = self.prepare(prediction);

        let mut accumulator = ScoreAccumulator::new();
        accumulator.compare(&truth, &prediction);
        accumulator
    }

    /// Drop excluded fields, then standardise if configured.
    pub fn prepare(&self, mut record: Record) -> Value {
        for field in &self.config.excluded_fields {
            record.shift_remove(field);
        }

        if self.config.standardise {
            Value::Record(standardise_document(&record))
        } else {
            Value::Record(record)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Value::from(value).as_record().cloned().unwrap()
    }

    fn item(id: &str, truth: serde_json::Value, prediction: Option<&str>) -> EvalItem {
        EvalItem {
            id: id.to_string(),
            image: None,
            ground_truth: Value::from(truth),
            prediction: prediction.map(str::to_string),
        }
    }

    fn raw_config() -> ScoringConfig {
        ScoringConfig {
            standardise: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_results_summary() {
        let mut results = EvaluationResults::new("test");
        for (id, tp, count) in [("1", 3, 4), ("2", 1, 2)] {
            results.item_results.push(ItemResult {
                item_id: id.to_string(),
                image: None,
                has_prediction: id == "1",
                true_positive: tp,
                count,
                accuracy: tp as f64 / count as f64,
            });
        }

        results.calculate_summary();

        assert_eq!(results.total_items, 2);
        assert_eq!(results.items_with_prediction, 1);
        assert!((results.mean_item_accuracy - 0.625).abs() < 1e-9);
    }

    #[test]
    fn test_run_merges_item_counts() {
        let mut dataset = EvalDataset::new("pairs");
        dataset.add_item(item(
            "a",
            json!({"Total": "10.00", "VAT": "2.00"}),
            Some(r#"```json
{"Total": "10.00", "VAT": "3.00"}
```"#),
        ));
        dataset.add_item(item("b", json!({"Total": "5.00"}), Some(r#"{"Total": "5.00"}"#)));
        dataset.add_item(item("c", json!({"Total": "1.00"}), None));

        let results = Evaluator::new(raw_config()).run(&dataset);

        assert_eq!(results.total_items, 3);
        assert_eq!(results.items_with_prediction, 2);
        assert_eq!(results.report.true_positive, 2);
        assert_eq!(results.report.count, 4);
        assert!((results.report.accuracy - 0.5).abs() < 1e-9);
        assert_eq!(results.item_results[2].accuracy, 0.0);
        assert_eq!(results.report.fields["Total"].count, 3);
    }

    #[test]
    fn test_max_items() {
        let mut dataset = EvalDataset::new("pairs");
        for id in ["a", "b", "c"] {
            dataset.add_item(item(id, json!({"Total": "1"}), Some(r#"{"Total": "1"}"#)));
        }

        let results = Evaluator::new(raw_config())
            .with_max_items(Some(2))
            .run(&dataset);
        assert_eq!(results.total_items, 2);
        assert_eq!(results.report.accuracy, 1.0);
    }

    #[test]
    fn test_excluded_fields_are_not_scored() {
        let evaluator = Evaluator::new(raw_config());
        let accumulator = evaluator.compare(
            record(json!({"Total": "1", "Img_path": "a.png", "Doc Transcript": "text"})),
            record(json!({"Total": "1"})),
        );
        assert_eq!(accumulator.count(), 1);
        assert_eq!(accumulator.accuracy(), 1.0);
    }

    #[test]
    fn test_prepare_keeps_field_order() {
        let prepared = Evaluator::new(raw_config()).prepare(record(json!({
            "Invoice Number": "INV-1",
            "Img_path": "a.png",
            "Total": "1",
            "VAT": "0.2",
        })));
        let keys: Vec<_> = prepared.as_record().unwrap().keys().collect();
        assert_eq!(keys, vec!["Invoice Number", "Total", "VAT"]);
    }

    #[test]
    fn test_standardised_comparison() {
        let evaluator = Evaluator::default();
        let accumulator = evaluator.compare(
            record(json!({
                "Total": "£1,200.00",
                "Date of Invoice": "16/04/2024",
                "Line Items": [{"Total": "1200", "Description": "Consulting"}],
            })),
            record(json!({
                "Total": "1200",
                "Date of Invoice": "2024-04-16",
                "Line Items": [{"Total": "£1,200.00", "Description": "Consulting"}],
            })),
        );
        assert_eq!(accumulator.count(), 4);
        assert_eq!(accumulator.true_positive(), 4);
    }

    #[test]
    fn test_save_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        let results = EvaluationResults::new("empty");
        results.save_json(&path).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["dataset_name"], "empty");
        assert_eq!(saved["report"]["count"], 0);
    }
}
