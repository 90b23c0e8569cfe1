//! Field-level accuracy scoring of predicted records against ground truth.
//!
//! The scorer walks the ground truth and the prediction in parallel:
//! - sequences are compared by position; a missing predicted entry is
//!   replaced with an empty record so every ground-truth leaf below it counts
//!   as a miss, and extra predicted entries are ignored
//! - records are compared key by key in ground-truth order; a missing
//!   predicted key is `Null`
//! - `Null` and `""` ground-truth leaves are skipped entirely
//! - every other scalar is one scored leaf, matched by exact equality
//!
//! A prediction with the wrong shape never raises: it just fails to match.

use crate::value::{Record, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static NULL: Value = Value::Null;
static EMPTY_RECORD: LazyLock<Value> = LazyLock::new(|| Value::Record(Record::new()));

/// Hit/total counts for one field path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTally {
    /// Leaves at this path whose prediction matched.
    pub true_positive: usize,
    /// Scored leaves at this path.
    pub count: usize,
}

impl FieldTally {
    /// Fraction of matched leaves (0 when nothing was scored).
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive, self.count)
    }
}

/// Serializable snapshot of an accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub true_positive: usize,
    pub false_positive: usize,
    pub count: usize,
    pub accuracy: f64,
    /// Per-field tallies keyed by path, with sequence indices collapsed.
    pub fields: BTreeMap<String, FieldTally>,
}

/// Running counters for one comparison run.
///
/// Create one accumulator per independent evaluation; call
/// [`compare`](Self::compare) once per document pair (or once with two
/// sequences of documents) and read [`accuracy`](Self::accuracy) at the end.
#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    true_positive: usize,
    false_positive: usize,
    count: usize,
    fields: BTreeMap<String, FieldTally>,
}

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Path to the leaf being scored, with concrete sequence indices.
struct FieldPath<'p, 'a>(&'p [Segment<'a>]);

impl FieldPath<'_, '_> {
    /// Path with indices collapsed to `[]`, used as the tally key.
    fn tally_key(&self) -> String {
        let mut key = String::new();
        for segment in self.0 {
            match segment {
                Segment::Key(name) => {
                    if !key.is_empty() {
                        key.push('.');
                    }
                    key.push_str(name);
                }
                Segment::Index(_) => key.push_str("[]"),
            }
        }
        key
    }
}

impl fmt::Display for FieldPath<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in self.0 {
            match segment {
                Segment::Key(name) => {
                    if !first {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Segment::Index(i) => write!(f, "[{}]", i)?,
            }
            first = false;
        }
        Ok(())
    }
}

impl ScoreAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare a ground-truth value against a prediction of the same shape
    /// and add the outcome to the running counters.
    pub fn compare(&mut self, truth: &Value, pred: &Value) {
        let mut path = Vec::new();
        self.compare_at(truth, pred, &mut path);
    }

    fn compare_at<'a>(&mut self, truth: &'a Value, pred: &Value, path: &mut Vec<Segment<'a>>) {
        match truth {
            Value::Sequence(items) => {
                let predicted = pred.as_sequence().unwrap_or_default();
                for (i, item) in items.iter().enumerate() {
                    let partner = predicted.get(i).unwrap_or(&*EMPTY_RECORD);
                    path.push(Segment::Index(i));
                    self.compare_at(item, partner, path);
                    path.pop();
                }
            }
            Value::Record(fields) => {
                for (key, value) in fields.iter() {
                    let partner = pred.get(key).unwrap_or(&NULL);
                    path.push(Segment::Key(key));
                    self.compare_at(value, partner, path);
                    path.pop();
                }
            }
            Value::Null => {}
            Value::String(s) if s.is_empty() => {}
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                self.score_leaf(truth, pred, &FieldPath(path.as_slice()));
            }
        }
    }

    fn score_leaf(&mut self, truth: &Value, pred: &Value, path: &FieldPath<'_, '_>) {
        let matched = pred == truth;

        tracing::debug!(field = %path, truth = %truth, pred = %pred, matched, "scored leaf");

        self.count += 1;
        if matched {
            self.true_positive += 1;
        } else {
            self.false_positive += 1;
        }

        let tally = self.fields.entry(path.tally_key()).or_default();
        tally.count += 1;
        if matched {
            tally.true_positive += 1;
        }
    }

    /// Fold another accumulator's counters into this one.
    ///
    /// Merging per-document accumulators gives the same totals as comparing
    /// every document against one shared accumulator.
    pub fn merge(&mut self, other: &ScoreAccumulator) {
        self.true_positive += other.true_positive;
        self.false_positive += other.false_positive;
        self.count += other.count;
        for (path, tally) in &other.fields {
            let entry = self.fields.entry(path.clone()).or_default();
            entry.true_positive += tally.true_positive;
            entry.count += tally.count;
        }
    }

    /// Matched leaves so far.
    pub fn true_positive(&self) -> usize {
        self.true_positive
    }

    /// Mismatched leaves so far.
    pub fn false_positive(&self) -> usize {
        self.false_positive
    }

    /// Scored leaves so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// `true_positive / count`, or 0 when nothing has been scored.
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive, self.count)
    }

    /// Tally for a single field path such as `Line Items[].VAT`.
    pub fn field(&self, path: &str) -> Option<FieldTally> {
        self.fields.get(path).copied()
    }

    /// Snapshot of the counters.
    pub fn report(&self) -> ScoreReport {
        ScoreReport {
            true_positive: self.true_positive,
            false_positive: self.false_positive,
            count: self.count,
            accuracy: self.accuracy(),
            fields: self.fields.clone(),
        }
    }
}

/// Score a single ground-truth/prediction pair with a fresh accumulator.
pub fn score(truth: &Value, pred: &Value) -> ScoreReport {
    let mut accumulator = ScoreAccumulator::new();
    accumulator.compare(truth, pred);
    accumulator.report()
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
