//! Rank-Biased Utility (RBU)
//!
//! Diversity metric from "An Axiomatic Analysis of Diversity Evaluation
//! Metrics: Introducing the Rank-Biased Utility Metric" (Amigó, Spina,
//! Carrillo-de-Albornoz, SIGIR 2018).
//!
//! For a test case with aspects `a` of weight `w(a)` and a system ranking
//! `d_0, d_1, ...`:
//!
//! ```text
//! RBU = Σ_a w(a) · (1-p) · Σ_i p^i · REL(d_i, a) · Π_{j<i} (1 - REL(d_j, a))
//!       - e · (1-p) · Σ_i p^i
//!
//! REL(d, a) = (2^rel(d, a) - 1) / 2^max_rel(a)
//!           = 2^(rel(d, a) - max_rel(a)) - 2^(-max_rel(a))
//! ```
//!
//! `max_rel(a)` is the relevance at the head of the aspect's ideal ranking.
//! Items without a gold entry for the aspect have `REL = 0`, as does every
//! item of an aspect whose ideal ranking is empty.
//!
//! The redundancy product is carried forward position by position instead of
//! being recomputed per position.

use crate::ranking::ideal_ranking;
use crate::result::EvaluationResult;
use crate::store::AnnotationStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Metric name used in reports
pub const METRIC_NAME: &str = "RBU";

/// Persistence `p` and tolerance `e`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RbuParameters {
    /// Probability of continuing to the next position, in (0, 1)
    pub p: f64,
    /// Cost of inspecting a position, >= 0
    pub e: f64,
}

impl Default for RbuParameters {
    fn default() -> Self {
        Self { p: 0.8, e: 0.03 }
    }
}

impl RbuParameters {
    /// Create validated parameters
    ///
    /// # Errors
    /// `Error::InvalidParameter` if `p` is outside (0, 1), `e` is negative,
    /// or either is not finite.
    pub fn new(p: f64, e: f64) -> Result<Self> {
        if !p.is_finite() || p <= 0.0 || p >= 1.0 {
            return Err(Error::InvalidParameter(format!(
                "p must be in (0, 1), got {}",
                p
            )));
        }
        if !e.is_finite() || e < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "e must be >= 0, got {}",
                e
            )));
        }
        Ok(Self { p, e })
    }
}

/// Scores system output stores against a gold standard store
#[derive(Debug, Clone, Copy, Default)]
pub struct RbuEvaluator {
    params: RbuParameters,
}

impl RbuEvaluator {
    pub fn new(params: RbuParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> RbuParameters {
        self.params
    }

    /// Score every gold standard test case
    ///
    /// The gold store is assumed to have ingested without halting. Test cases
    /// missing from the system output are scored against an empty ranking;
    /// test cases only in the system output get no entry.
    pub fn evaluate(&self, reference: &AnnotationStore, candidate: &AnnotationStore) -> EvaluationResult {
        let mut result = EvaluationResult::new(METRIC_NAME);

        for test_case in reference.test_cases() {
            let ranking = candidate.ranking(test_case);
            let score = self.score_test_case(reference, test_case, ranking);
            debug!(test_case, ranking_len = ranking.len(), score, "Scored test case");
            result.insert(test_case, Some(score));
        }

        result
    }

    /// RBU for one test case and one ranking
    pub fn score_test_case(&self, reference: &AnnotationStore, test_case: &str, ranking: &[String]) -> f64 {
        let p = self.params.p;

        let left: f64 = reference
            .aspect_weights(test_case)
            .iter()
            .map(|(aspect, weight)| weight * self.aspect_utility(reference, test_case, aspect, ranking) * (1.0 - p))
            .sum();

        let right = self.params.e * (1.0 - p) * discount_sum(p, ranking.len());

        left - right
    }

    /// Σ_i p^i · REL(i) · Π_{j<i}(1 - REL(j)) for one aspect
    fn aspect_utility(&self, reference: &AnnotationStore, test_case: &str, aspect: &str, ranking: &[String]) -> f64 {
        let max_rel = ideal_ranking(reference, test_case, aspect)
            .first()
            .and_then(|item| reference.relevance(test_case, item, aspect));

        let mut utility = 0.0;
        let mut redundancy = 1.0;
        let mut discount = 1.0;

        for item in ranking {
            if let Some(rel) = reference.relevance(test_case, item, aspect) {
                // (2^rel - 1) / 2^max_rel without overflowing for large relevance
                let gain = match max_rel {
                    Some(max_rel) => (rel - max_rel).exp2() - (-max_rel).exp2(),
                    None => 0.0,
                };
                utility += discount * gain * redundancy;
                redundancy *= 1.0 - gain;
            }
            discount *= self.params.p;
        }

        utility
    }
}

/// Σ_{i<n} p^i
fn discount_sum(p: f64, n: usize) -> f64 {
    let mut sum = 0.0;
    let mut discount = 1.0;
    for _ in 0..n {
        sum += discount;
        discount *= p;
    }
    sum
}
