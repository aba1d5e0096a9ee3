//! End-to-end tests: gold standard and system output files on disk through
//! ingestion, evaluation and aggregation.

use rbu_common::{ingest_file, Error, FormatMode, RbuEvaluator, RbuParameters};
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const GOLD: &str = "\
T1\tA\t2\tasp1\t1
T1\tB\t1\tasp1\t1
T2\tC\t1\tasp1\t0.5
T2\tD\t3\tasp2\t0.5
T2\tC\t2\tasp2\t0.5
";

#[test]
fn test_scores_every_gold_test_case() {
    let dir = TempDir::new().unwrap();
    let gold = ingest_file(&write(&dir, "gold.tsv", GOLD), FormatMode::Reference).unwrap();
    let run = ingest_file(
        &write(&dir, "run.tsv", "T1\tA\nT1\tB\nT3\tZ\n"),
        FormatMode::Candidate,
    )
    .unwrap();

    assert!(!gold.outcome.halted);
    assert!(!run.outcome.halted);

    let result = RbuEvaluator::new(RbuParameters::default()).evaluate(&gold.store, &run.store);

    let scored: Vec<&str> = result.iter().map(|(tc, _)| tc).collect();
    assert_eq!(scored, vec!["T1", "T2"]);
    assert!((result.score("T1").unwrap() - 0.1492).abs() < 1e-9);
    assert_eq!(result.score("T2"), Some(0.0));
    assert!(!result.contains("T3"));

    let mean = result.aggregate().unwrap();
    assert!((mean - 0.0746).abs() < 1e-9);
}

#[test]
fn test_gold_errors_halt_with_line_numbers() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "gold.tsv",
        "T1\tA\t2\tasp1\t1\nT1\tB\tx\tasp1\t1\nT1\tA\t1\tasp1\t1\n",
    );
    let gold = ingest_file(&path, FormatMode::Reference).unwrap();

    assert!(gold.outcome.halted);
    let lines: Vec<Option<u64>> = gold.outcome.fatal().map(|d| d.line).collect();
    assert_eq!(lines, vec![Some(2), Some(3)]);
    assert!(gold.outcome.diagnostics[0]
        .to_string()
        .contains(&path.display().to_string()));
}

#[test]
fn test_quoted_fields_are_unwrapped() {
    let dir = TempDir::new().unwrap();
    let gold = ingest_file(
        &write(&dir, "gold.tsv", "\"T1\"\t\"A\"\t\"2\"\t\"asp1\"\t\"1\"\n"),
        FormatMode::Reference,
    )
    .unwrap();
    assert!(!gold.outcome.halted);
    assert_eq!(gold.store.relevance("T1", "A", "asp1"), Some(2.0));
}

#[test]
fn test_run_warnings_do_not_halt() {
    let dir = TempDir::new().unwrap();
    let run = ingest_file(
        &write(&dir, "run.tsv", "T1\tA\nT1\tA\nT1\nT1\tB\n"),
        FormatMode::Candidate,
    )
    .unwrap();

    assert!(!run.outcome.halted);
    assert_eq!(run.outcome.fatal().count(), 0);
    assert_eq!(run.outcome.warnings().count(), 2);
    assert_eq!(run.store.ranking("T1"), ["A", "B"]);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = ingest_file(&dir.path().join("absent.tsv"), FormatMode::Reference);
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_empty_ranking_sign_depends_on_tolerance() {
    let dir = TempDir::new().unwrap();
    let gold = ingest_file(&write(&dir, "gold.tsv", GOLD), FormatMode::Reference).unwrap();
    let run = ingest_file(&write(&dir, "run.tsv", "T1\tX\n"), FormatMode::Candidate).unwrap();

    let strict = RbuEvaluator::new(RbuParameters::new(0.8, 0.0).unwrap());
    let tolerant = RbuEvaluator::new(RbuParameters::new(0.8, 0.05).unwrap());

    assert_eq!(strict.evaluate(&gold.store, &run.store).score("T1"), Some(0.0));
    assert!(tolerant.evaluate(&gold.store, &run.store).score("T1").unwrap() < 0.0);
    // T2 has no ranking at all: no tolerance cost either
    assert_eq!(tolerant.evaluate(&gold.store, &run.store).score("T2"), Some(0.0));
}
