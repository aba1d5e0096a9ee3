//! Per-test-case results and their aggregation

use serde::Serialize;
use std::collections::HashMap;

/// Scores of one metric, keyed by test case
///
/// A `None` score means the test case exists but no value could be computed.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    metric: String,
    order: Vec<String>,
    scores: HashMap<String, Option<f64>>,
}

impl EvaluationResult {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            order: Vec::new(),
            scores: HashMap::new(),
        }
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Set the score of a test case, keeping first insertion order
    pub fn insert(&mut self, test_case: &str, score: Option<f64>) {
        if self.scores.insert(test_case.to_string(), score).is_none() {
            self.order.push(test_case.to_string());
        }
    }

    /// Score of a test case; `None` when absent or unscored
    pub fn score(&self, test_case: &str) -> Option<f64> {
        self.scores.get(test_case).copied().flatten()
    }

    pub fn contains(&self, test_case: &str) -> bool {
        self.scores.contains_key(test_case)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// (test case, score) in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.order
            .iter()
            .map(|tc| (tc.as_str(), self.scores.get(tc).copied().flatten()))
    }

    /// Mean over all scored test cases
    pub fn aggregate(&self) -> Option<f64> {
        aggregate(self.iter().map(|(_, score)| score))
    }
}

/// Arithmetic mean of the non-null scores
///
/// `None` only when there are no entries at all. Entries that are all null,
/// or whose sum is exactly zero, aggregate to `0.0`.
pub fn aggregate<I>(scores: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut entries = 0usize;
    let mut total = 0.0;
    let mut scored = 0usize;

    for score in scores {
        entries += 1;
        if let Some(value) = score {
            total += value;
            scored += 1;
        }
    }

    if entries == 0 {
        None
    } else if total == 0.0 {
        Some(0.0)
    } else {
        Some(total / scored as f64)
    }
}
