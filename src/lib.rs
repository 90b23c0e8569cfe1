//! Invoice Eval - field-level accuracy scoring for invoice extraction models.
//!
//! A vision-language model reads an invoice and answers with a nested JSON
//! record. This library measures how much of that record matches the labelled
//! ground truth:
//! 1. Raw field values are standardised into canonical forms (dates,
//!    amounts, addresses, bank details) so formatting differences do not
//!    count as errors
//! 2. The two records are walked in parallel and every non-empty ground-truth
//!    leaf is scored as matched or missed
//! 3. Accuracy is `matched / scored`, per document or over a dataset
//!
//! # Quick Start
//!
//! ```
//! use invoice_eval::{extract::parse_prediction, metrics::score, standardise, Value};
//! use serde_json::json;
//!
//! let truth = Value::from(json!({"Total": "£1,200", "Date of Invoice": "16/04/2024"}));
//! let response = "```json\n{\"Total\": \"1200.00\", \"Date of Invoice\": \"2024-04-16\"}\n```";
//!
//! let truth = standardise::standardise_document(truth.as_record().unwrap());
//! let prediction = standardise::standardise_document(&parse_prediction(response));
//!
//! let report = score(&Value::Record(truth), &Value::Record(prediction));
//! assert_eq!(report.accuracy, 1.0);
//! ```
//!
//! # Architecture
//!
//! - **Value**: nested JSON-like records, sequences and scalars
//! - **ScoreAccumulator**: recursive leaf-by-leaf comparison and counters
//! - **standardise**: canonical forms per field kind and the invoice schema
//! - **Evaluator**: dataset-level runs over JSONL exports

pub mod config;
pub mod error;
pub mod eval;
pub mod extract;
pub mod metrics;
pub mod standardise;
pub mod value;

// Re-export commonly used types
pub use config::Config;
pub use error::{EvalError, Result};
pub use eval::{EvalDataset, EvaluationResults, Evaluator};
pub use metrics::{ScoreAccumulator, ScoreReport, score};
pub use standardise::{FieldKind, standardise_value};
pub use value::{Record, Value};
