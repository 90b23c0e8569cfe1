//! Batch evaluation of model predictions against labelled invoices.
//!
//! This module provides:
//! - JSONL dataset loading (conversation and ground-truth/prediction pair rows)
//! - An evaluator that standardises, compares and aggregates per-item scores

pub mod dataset;
pub mod runner;

pub use dataset::{EvalDataset, EvalItem, load_predictions};
pub use runner::{EvaluationResults, Evaluator, ItemResult};
