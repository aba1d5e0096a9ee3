//! EvALL TSV report
//!
//! A `#` comment block followed by a fully quoted, tab-separated table with
//! one row per test case. Gold standard test cases come first in gold order,
//! then test cases that only appear in the system output. Test cases without
//! a score show `-`.

use rbu_common::{AnnotationStore, EvaluationResult, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const RULE: &str = "############################################################################";

/// Write the report to a file, replacing it if present
pub fn write_report(
    path: &Path,
    gold: &AnnotationStore,
    output: &AnnotationStore,
    result: &EvaluationResult,
) -> Result<()> {
    let file = File::create(path)?;
    write_report_to(BufWriter::new(file), gold, output, result)
}

/// Write the report to any writer
pub fn write_report_to<W: Write>(
    mut out: W,
    gold: &AnnotationStore,
    output: &AnnotationStore,
    result: &EvaluationResult,
) -> Result<()> {
    write_header(&mut out, output.source(), result.metric())?;

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    wtr.write_record(["Test Case", result.metric()])?;

    let output_only = output.test_cases().filter(|tc| !gold.contains_test_case(tc));
    for test_case in gold.test_cases().chain(output_only) {
        let score = format_score(result.score(test_case));
        wtr.write_record([test_case, score.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Score with 4 decimals, `-` when there is none
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(value) => format!("{:.4}", value),
        None => "-".to_string(),
    }
}

fn write_header<W: Write>(out: &mut W, output_source: &str, metric: &str) -> std::io::Result<()> {
    writeln!(out, "#{}", RULE)?;
    writeln!(out, "#\t\t\t\tAUTOMATIC EvALL TSV REPORT")?;
    writeln!(out, "#")?;
    writeln!(out, "#\tWe kindly ask you to cite the following work when using EvALL:")?;
    writeln!(
        out,
        "#\t\t\tAn Axiomatic Analysis of Diversity Evaluation Metrics: Introducing the Rank-Biased Utility Metric"
    )?;
    writeln!(out, "#\t\t\tEnrique Amigó, Damiano Spina, Jorge Carrillo-de-Albornoz")?;
    writeln!(out, "#\t\t\tIn proceedings of SIGIR'18")?;
    writeln!(out, "#")?;
    writeln!(out, "#\tThis file contains the results for the output: ")?;
    writeln!(out, "#\t\t\t\u{2022} {}", output_source)?;
    writeln!(out, "#")?;
    writeln!(out, "#\tThe next table contains the results for each test case in this output. ")?;
    writeln!(
        out,
        "#\tNotice that first are shown the test cases present in the gold, and after that those not present. "
    )?;
    writeln!(
        out,
        "#\tThose measures that do not satisfy the preconditions are marked with -."
    )?;
    writeln!(out, "#{}", RULE)?;
    writeln!(out, "#The measures included in the table are:")?;
    writeln!(out, "#\t\t- {}", metric)?;
    writeln!(out, "#{}", RULE)?;
    Ok(())
}
