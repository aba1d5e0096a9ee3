//! rbu-eval library - RBU evaluation of one system output
//!
//! Reads a gold standard and a system output, scores every gold test case
//! with Rank-Biased Utility and writes an EvALL TSV report (plus an optional
//! JSON export).
//!
//! A gold standard with format errors aborts the run before any report is
//! written. System output problems are logged and the run continues.

use anyhow::{bail, Context, Result};
use clap::Parser;
use rbu_common::config::TomlConfig;
use rbu_common::{ingest_file, EvaluationResult, FormatMode, RbuEvaluator, RbuParameters};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub mod export;
pub mod report;

/// Rank-Biased Utility diversity evaluation
///
/// Scores a system output against a gold standard, both headerless TSV:
///   gold standard: test case, item, relevance, aspect, aspect weight
///   system output: test case, item (row order is the ranking)
///
/// Example:
///   rbu-eval 0.8 0.03 test/gold.tsv test/output.tsv
#[derive(Parser, Debug, Clone)]
#[command(name = "rbu-eval")]
#[command(version)]
#[command(about, long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Args {
    /// Persistence parameter p, in (0, 1)
    #[arg(value_name = "P")]
    pub p: f64,

    /// Tolerance parameter e, >= 0
    #[arg(value_name = "E")]
    pub e: f64,

    /// Gold standard file
    #[arg(value_name = "GOLD")]
    pub gold: String,

    /// System output file
    #[arg(value_name = "OUTPUT")]
    pub output: String,

    /// EvALL TSV report path (overrides the config file)
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Also export results as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Configuration file (overrides RBU_CONFIG)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub result: EvaluationResult,
    pub aggregate: Option<f64>,
    pub report_path: PathBuf,
    pub json_path: Option<PathBuf>,
}

/// Evaluate one system output and write its report
///
/// # Errors
/// Empty file names, invalid parameters, unreadable files, a gold standard
/// with format errors, or a report that cannot be written.
pub fn run(args: &Args, config: &TomlConfig) -> Result<RunSummary> {
    if args.gold.is_empty() {
        bail!("The name of the gold standard file cannot be empty");
    }
    if args.output.is_empty() {
        bail!("The name of the system output file cannot be empty");
    }

    let params = RbuParameters::new(args.p, args.e).context("Invalid metric parameters")?;
    info!("Parameters: p = {}, e = {}", params.p, params.e);

    // Gold standard errors stop the evaluation
    let gold = ingest_file(Path::new(&args.gold), FormatMode::Reference)
        .with_context(|| format!("Failed to read gold standard {}", args.gold))?;
    if gold.outcome.halted {
        bail!(
            "Gold standard {} has {} format error(s); evaluation aborted",
            args.gold,
            gold.outcome.fatal().count()
        );
    }

    // System output problems only degrade the ranking
    let output = ingest_file(Path::new(&args.output), FormatMode::Candidate)
        .with_context(|| format!("Failed to read system output {}", args.output))?;
    if output.outcome.halted {
        error!(
            "System output {} is not usable as a ranking; affected test cases score against an empty ranking",
            args.output
        );
    } else if output.outcome.warnings().next().is_some() {
        warn!(
            "System output {} has {} warning(s); the evaluation might not be reliable",
            args.output,
            output.outcome.warnings().count()
        );
    }

    let evaluator = RbuEvaluator::new(params);
    let result = evaluator.evaluate(&gold.store, &output.store);
    let aggregate = result.aggregate();

    if result.is_empty() {
        warn!("No gold standard test cases to evaluate");
    } else if let Some(mean) = aggregate {
        info!(
            "{} over {} test case(s): {:.4}",
            result.metric(),
            result.len(),
            mean
        );
    }

    let report_path = args
        .report
        .clone()
        .unwrap_or_else(|| config.report.path.clone());
    report::write_report(&report_path, &gold.store, &output.store, &result)
        .with_context(|| format!("Failed to write report {}", report_path.display()))?;
    info!("Report written to {}", report_path.display());

    let json_path = args.json.clone().or_else(|| config.report.json.clone());
    if let Some(path) = &json_path {
        export::ResultExport::new(evaluator.params(), &gold, &output, &result)
            .export_json(path)
            .with_context(|| format!("Failed to export JSON {}", path.display()))?;
        info!("JSON results exported to {}", path.display());
    }

    Ok(RunSummary {
        result,
        aggregate,
        report_path,
        json_path,
    })
}
