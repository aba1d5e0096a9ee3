use proptest::prelude::*;
use rbu_common::ranking::ideal_ranking;
use rbu_common::tabular::read_records_from;
use rbu_common::{ingest, AnnotationStore, FormatMode, RbuEvaluator, RbuParameters};

fn store(text: &str, mode: FormatMode) -> AnnotationStore {
    let ingestion = ingest("prop.tsv", &read_records_from(text.as_bytes()), mode);
    // an empty run halts its ingestion but is still a valid (empty) ranking
    if mode == FormatMode::Reference {
        assert!(!ingestion.outcome.halted, "{:?}", ingestion.outcome);
    }
    ingestion.store
}

/// Gold standard with one aspect per item: (item index, relevance, aspect index)
fn gold_text(rows: &[(usize, u8, usize)], weights: &[f64]) -> String {
    let mut seen = std::collections::HashSet::new();
    rows.iter()
        .filter(|(item, _, _)| seen.insert(*item))
        .map(|(item, rel, aspect)| {
            format!("T1\td{}\t{}\tasp{}\t{}\n", item, rel, aspect, weights[*aspect])
        })
        .collect()
}

fn run_text(items: &[usize]) -> String {
    items.iter().map(|item| format!("T1\td{}\n", item)).collect()
}

proptest! {
    #[test]
    fn prop_ideal_ranking_sorted_descending(
        rels in prop::collection::vec(1u32..1000, 1..20)
    ) {
        let mut distinct = rels.clone();
        distinct.sort_unstable();
        distinct.dedup();

        let text: String = distinct
            .iter()
            .enumerate()
            .map(|(i, rel)| format!("T1\td{}\t{}\tasp1\t1\n", i, rel))
            .collect();
        let gold = store(&text, FormatMode::Reference);

        let ranking = ideal_ranking(&gold, "T1", "asp1");
        let expected: Vec<String> = (0..distinct.len()).rev().map(|i| format!("d{}", i)).collect();
        prop_assert_eq!(ranking, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn prop_duplicates_in_run_do_not_change_score(
        gold_rows in prop::collection::vec((0usize..8, 0u8..4, 0usize..3), 1..12),
        run in prop::collection::vec(0usize..10, 0..15),
        p in 0.05f64..0.95,
        e in 0.0f64..0.2,
    ) {
        let gold = store(&gold_text(&gold_rows, &[1.0, 0.5, 2.0]), FormatMode::Reference);

        let mut seen = std::collections::HashSet::new();
        let deduped: Vec<usize> = run.iter().copied().filter(|i| seen.insert(*i)).collect();

        let evaluator = RbuEvaluator::new(RbuParameters::new(p, e).unwrap());
        let with_dups = evaluator.evaluate(&gold, &store(&run_text(&run), FormatMode::Candidate));
        let without = evaluator.evaluate(&gold, &store(&run_text(&deduped), FormatMode::Candidate));

        prop_assert_eq!(with_dups.score("T1"), without.score("T1"));
    }

    #[test]
    fn prop_score_bounded_without_tolerance(
        gold_rows in prop::collection::vec((0usize..8, 0u8..4, 0usize..3), 1..12),
        run in prop::collection::hash_set(0usize..10, 0..10),
        p in 0.05f64..0.95,
    ) {
        let weights = [1.0, 0.5, 2.0];
        let gold = store(&gold_text(&gold_rows, &weights), FormatMode::Reference);
        let run: Vec<usize> = run.into_iter().collect();

        let evaluator = RbuEvaluator::new(RbuParameters::new(p, 0.0).unwrap());
        let result = evaluator.evaluate(&gold, &store(&run_text(&run), FormatMode::Candidate));
        let score = result.score("T1").unwrap();

        let weight_sum: f64 = gold.aspect_weights("T1").iter().map(|(_, w)| w).sum();
        prop_assert!(score >= 0.0);
        prop_assert!(score <= weight_sum * (1.0 - p) + 1e-12);
    }

    #[test]
    fn prop_every_gold_test_case_scored_and_mean_aggregated(
        cases in prop::collection::vec((0usize..5, 1u8..4), 1..10),
        p in 0.05f64..0.95,
        e in 0.0f64..0.2,
    ) {
        let text: String = cases
            .iter()
            .enumerate()
            .map(|(i, (tc, rel))| format!("T{}\td{}\t{}\tasp1\t1\n", tc, i, rel))
            .collect();
        let gold = store(&text, FormatMode::Reference);
        let run = store("T0\td0\nT1\td1\nT1\td0\n", FormatMode::Candidate);

        let result = RbuEvaluator::new(RbuParameters::new(p, e).unwrap()).evaluate(&gold, &run);

        let scores: Vec<f64> = gold
            .test_cases()
            .map(|tc| result.score(tc))
            .collect::<Option<Vec<_>>>()
            .expect("every gold test case scored");
        prop_assert_eq!(result.len(), gold.test_case_count());

        let total: f64 = scores.iter().sum();
        let expected = if total == 0.0 { 0.0 } else { total / scores.len() as f64 };
        let mean = result.aggregate().unwrap();
        prop_assert!((mean - expected).abs() < 1e-12);
    }

    #[test]
    fn prop_ideal_order_scores_highest(
        (rels, order) in prop::collection::hash_set(1u32..20, 2..7).prop_flat_map(|rels| {
            let rels: Vec<u32> = rels.into_iter().collect();
            let indices: Vec<usize> = (0..rels.len()).collect();
            (Just(rels), Just(indices).prop_shuffle())
        }),
        p in 0.05f64..0.95,
    ) {
        let text: String = rels
            .iter()
            .enumerate()
            .map(|(i, rel)| format!("T1\td{}\t{}\tasp1\t1\n", i, rel))
            .collect();
        let gold = store(&text, FormatMode::Reference);
        let evaluator = RbuEvaluator::new(RbuParameters::new(p, 0.0).unwrap());

        let ideal: String = ideal_ranking(&gold, "T1", "asp1")
            .iter()
            .map(|item| format!("T1\t{}\n", item))
            .collect();
        let ideal_score = evaluator
            .evaluate(&gold, &store(&ideal, FormatMode::Candidate))
            .score("T1")
            .unwrap();
        let shuffled_score = evaluator
            .evaluate(&gold, &store(&run_text(&order), FormatMode::Candidate))
            .score("T1")
            .unwrap();

        prop_assert!(
            ideal_score >= shuffled_score - 1e-12,
            "ideal {} < shuffled {} for order {:?}",
            ideal_score,
            shuffled_score,
            order
        );
    }

    #[test]
    fn prop_irrelevant_run_is_negative_with_tolerance(
        len in 1usize..20,
        p in 0.05f64..0.95,
        e in 0.001f64..0.5,
    ) {
        let gold = store("T1\tA\t2\tasp1\t1\n", FormatMode::Reference);
        let run: String = (0..len).map(|i| format!("T1\tx{}\n", i)).collect();
        let evaluator = RbuEvaluator::new(RbuParameters::new(p, e).unwrap());

        let result = evaluator.evaluate(&gold, &store(&run, FormatMode::Candidate));
        prop_assert!(result.score("T1").unwrap() < 0.0);
    }
}
