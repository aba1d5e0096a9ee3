//! Ideal ranking extraction
//!
//! The ideal ranking of an aspect lists every item with relevance > 0 for
//! that aspect, most relevant first. Its head fixes the gain normaliser used
//! by the RBU metric.
//!
//! Ties keep the order in which the items first appeared in the gold
//! standard file (stable sort over first-occurrence order).

use crate::store::AnnotationStore;

/// Items relevant to (test case, aspect) sorted by descending relevance
pub fn ideal_ranking<'a>(store: &'a AnnotationStore, test_case: &str, aspect: &str) -> Vec<&'a str> {
    let mut relevant = store.relevant_items(test_case, aspect);
    relevant.sort_by(|a, b| b.1.total_cmp(&a.1));
    relevant.into_iter().map(|(item, _)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{ingest, FormatMode};
    use crate::tabular::read_records_from;

    fn gold(text: &str) -> AnnotationStore {
        let ingestion = ingest("gold.tsv", &read_records_from(text.as_bytes()), FormatMode::Reference);
        assert!(!ingestion.outcome.halted, "{:?}", ingestion.outcome);
        ingestion.store
    }

    #[test]
    fn test_sorted_by_descending_relevance() {
        let store = gold("T1\tA\t1\tasp1\t1\nT1\tB\t3\tasp1\t1\nT1\tC\t2\tasp1\t1\n");
        assert_eq!(ideal_ranking(&store, "T1", "asp1"), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_excludes_zero_relevance_and_other_aspects() {
        let store = gold("T1\tA\t0\tasp1\t1\nT1\tB\t2\tasp2\t1\nT1\tC\t1\tasp1\t1\n");
        assert_eq!(ideal_ranking(&store, "T1", "asp1"), vec!["C"]);
        assert_eq!(ideal_ranking(&store, "T1", "asp2"), vec!["B"]);
    }

    #[test]
    fn test_ties_keep_first_occurrence_order() {
        let store = gold("T1\tX\t1\tasp1\t1\nT1\tY\t2\tasp1\t1\nT1\tZ\t1\tasp1\t1\n");
        assert_eq!(ideal_ranking(&store, "T1", "asp1"), vec!["Y", "X", "Z"]);
    }

    #[test]
    fn test_unknown_test_case_or_aspect_is_empty() {
        let store = gold("T1\tA\t1\tasp1\t1\n");
        assert!(ideal_ranking(&store, "T2", "asp1").is_empty());
        assert!(ideal_ranking(&store, "T1", "asp9").is_empty());
    }

    #[test]
    fn test_fractional_relevance() {
        let store = gold("T1\tA\t0.25\tasp1\t1\nT1\tB\t0.5\tasp1\t1\n");
        assert_eq!(ideal_ranking(&store, "T1", "asp1"), vec!["B", "A"]);
    }
}
