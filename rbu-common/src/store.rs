//! Annotation store
//!
//! Validated in-memory model of one input file. A gold standard store holds
//! graded relevance per (test case, item, aspect) and a weight per aspect; a
//! system output store holds only the presentation order of items.
//!
//! Stores are filled by `format::ingest` and are read-only afterwards.

use crate::format::{FormatMode, ParsedRow};
use std::collections::{HashMap, HashSet};

/// Aspect key used for every system output row
///
/// System outputs carry no aspects. Rows are still keyed by (item, aspect)
/// so duplicate detection works the same way in both modes. Cannot clash with
/// a gold standard aspect because it never reaches the metric.
pub const RANKING_ASPECT: &str = "#rank";

/// Validated model of one gold standard or system output file
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    source: String,
    mode: FormatMode,
    /// Test cases in first-occurrence order
    test_cases: Vec<String>,
    /// test case -> item -> aspect -> relevance (line number for system outputs)
    relevance: HashMap<String, HashMap<String, HashMap<String, f64>>>,
    /// test case -> (aspect, weight) in first-seen order
    aspect_weights: HashMap<String, Vec<(String, f64)>>,
    /// test case -> items in source order, one entry per accepted row
    rankings: HashMap<String, Vec<String>>,
}

impl AnnotationStore {
    /// Create an empty store for the given source path
    pub fn new(source: impl Into<String>, mode: FormatMode) -> Self {
        Self {
            source: source.into(),
            mode,
            test_cases: Vec::new(),
            relevance: HashMap::new(),
            aspect_weights: HashMap::new(),
            rankings: HashMap::new(),
        }
    }

    /// Path (or label) of the file this store was read from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Format the store was validated against
    pub fn mode(&self) -> FormatMode {
        self.mode
    }

    /// Test cases in the order they first appeared
    pub fn test_cases(&self) -> impl Iterator<Item = &str> {
        self.test_cases.iter().map(String::as_str)
    }

    pub fn test_case_count(&self) -> usize {
        self.test_cases.len()
    }

    pub fn contains_test_case(&self, test_case: &str) -> bool {
        self.relevance.contains_key(test_case)
    }

    /// Whether the item has at least one accepted row in the test case
    pub fn has_item(&self, test_case: &str, item: &str) -> bool {
        self.relevance
            .get(test_case)
            .is_some_and(|items| items.contains_key(item))
    }

    /// Recorded value for (test case, item, aspect)
    pub fn relevance(&self, test_case: &str, item: &str, aspect: &str) -> Option<f64> {
        self.relevance
            .get(test_case)?
            .get(item)?
            .get(aspect)
            .copied()
    }

    /// Aspect weights of a test case in first-seen order (empty if unknown)
    pub fn aspect_weights(&self, test_case: &str) -> &[(String, f64)] {
        self.aspect_weights
            .get(test_case)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn aspect_weight(&self, test_case: &str, aspect: &str) -> Option<f64> {
        self.aspect_weights(test_case)
            .iter()
            .find(|(name, _)| name == aspect)
            .map(|(_, weight)| *weight)
    }

    /// Items of a test case in source order (empty if unknown)
    pub fn ranking(&self, test_case: &str) -> &[String] {
        self.rankings
            .get(test_case)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Items with relevance > 0 for the aspect, in first-occurrence order
    pub fn relevant_items(&self, test_case: &str, aspect: &str) -> Vec<(&str, f64)> {
        let mut seen = HashSet::new();
        self.ranking(test_case)
            .iter()
            .filter(|item| seen.insert(item.as_str()))
            .filter_map(|item| {
                self.relevance(test_case, item, aspect)
                    .filter(|value| *value > 0.0)
                    .map(|value| (item.as_str(), value))
            })
            .collect()
    }

    /// Record an accepted row
    ///
    /// The first weight seen for an aspect stands; later weights are ignored.
    pub(crate) fn insert(&mut self, row: &ParsedRow) {
        if !self.relevance.contains_key(&row.test_case) {
            self.test_cases.push(row.test_case.clone());
        }

        self.relevance
            .entry(row.test_case.clone())
            .or_default()
            .entry(row.item.clone())
            .or_default()
            .insert(row.aspect.clone(), row.value);

        self.rankings
            .entry(row.test_case.clone())
            .or_default()
            .push(row.item.clone());

        if let Some(weight) = row.weight {
            let weights = self.aspect_weights.entry(row.test_case.clone()).or_default();
            if !weights.iter().any(|(name, _)| *name == row.aspect) {
                weights.push((row.aspect.clone(), weight));
            }
        }
    }
}
