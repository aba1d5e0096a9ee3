//! Diversification input format validation
//!
//! Two headerless TSV layouts are accepted:
//!
//! | Mode      | Columns                                          | Anomalies |
//! |-----------|--------------------------------------------------|-----------|
//! | Reference | test case, item, relevance, aspect, aspect weight | fatal     |
//! | Candidate | test case, item                                  | warnings  |
//!
//! Row order in a candidate file is the ranking. In a reference file an item
//! may repeat within a test case as long as each row names a different aspect,
//! and every row of an aspect must carry the same weight.
//!
//! Validation never returns an error: every anomaly becomes a `Diagnostic`
//! and the `halted` flag tells the caller whether the store may be evaluated.

use crate::store::{AnnotationStore, RANKING_ASPECT};
use crate::tabular::{self, Record, RecordBatch};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{error, info, warn};

/// Which of the two formats a file is read as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatMode {
    /// Gold standard: strict, any anomaly halts evaluation
    Reference,
    /// System output: lenient, anomalous rows are skipped
    Candidate,
}

impl FormatMode {
    /// Number of fields every row must have
    pub fn expected_columns(&self) -> usize {
        match self {
            FormatMode::Reference => 5,
            FormatMode::Candidate => 2,
        }
    }

    /// Severity of a rejected row in this mode
    fn row_severity(&self) -> Severity {
        match self {
            FormatMode::Reference => Severity::Fatal,
            FormatMode::Candidate => Severity::Warning,
        }
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatMode::Reference => write!(f, "gold standard"),
            FormatMode::Candidate => write!(f, "system output"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Fatal,
}

/// Reason a row or file was flagged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Issue {
    ColumnCount { expected: usize, found: usize },
    EmptyField,
    NotNumeric,
    Negative,
    /// Item repeated in a system output test case
    DuplicateItem,
    /// Item repeated with the same aspect in a gold standard test case
    DuplicateItemAspect,
    /// Aspect seen again with another weight; the first weight is kept
    ConflictingWeight { kept: f64, ignored: f64 },
    EmptyFile,
    /// Every row had the wrong number of columns
    AllRowsMalformed { expected: usize },
    /// Record the reader could not decode
    Malformed(String),
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::ColumnCount { expected, found } => write!(
                f,
                "the number of columns must be {} (found {})",
                expected, found
            ),
            Issue::EmptyField => write!(f, "the columns in the rows cannot be empty"),
            Issue::NotNumeric => write!(f, "the value is not a valid number"),
            Issue::Negative => write!(f, "the values must be greater than or equal to 0"),
            Issue::DuplicateItem => write!(
                f,
                "duplicated ids are not allowed at test case level, only the first instance is considered"
            ),
            Issue::DuplicateItemAspect => write!(
                f,
                "duplicated ids with the same aspect are not allowed at test case level"
            ),
            Issue::ConflictingWeight { kept, ignored } => write!(
                f,
                "aspect already has weight {}, weight {} is ignored",
                kept, ignored
            ),
            Issue::EmptyFile => write!(f, "the file is empty"),
            Issue::AllRowsMalformed { expected } => {
                write!(f, "the number of columns must be {} in all lines", expected)
            }
            Issue::Malformed(reason) => write!(f, "input file not well formed: {}", reason),
        }
    }
}

/// One anomaly found while ingesting a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub source: String,
    /// None for whole-file conditions
    pub line: Option<u64>,
    pub severity: Severity,
    pub issue: Issue,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "format warning",
            Severity::Fatal => "format error",
        };
        match self.line {
            Some(line) => write!(f, "{}: line {}: {}: {}", self.source, line, label, self.issue),
            None => write!(f, "{}: {}: {}", self.source, label, self.issue),
        }
    }
}

/// Ingestion status: halt flag plus every diagnostic in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestOutcome {
    pub halted: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl IngestOutcome {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn fatal(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Fatal)
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Fatal => {
                error!("{}", diagnostic);
                self.halted = true;
            }
            Severity::Warning => warn!("{}", diagnostic),
        }
        self.diagnostics.push(diagnostic);
    }
}

/// A row that passed validation, ready for the store
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub test_case: String,
    pub item: String,
    /// Always `RANKING_ASPECT` for system outputs
    pub aspect: String,
    /// Relevance for gold standards, 1-based line number for system outputs
    pub value: f64,
    /// Aspect weight, gold standards only
    pub weight: Option<f64>,
}

/// Verdict for a single row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accept(ParsedRow),
    /// Row is stored but its weight disagrees with the aspect's first weight
    AcceptIgnoringWeight { row: ParsedRow, kept: f64 },
    SkipWarn(Issue),
    RejectFatal(Issue),
}

/// Store plus the outcome of building it
#[derive(Debug, Clone)]
pub struct Ingestion {
    pub store: AnnotationStore,
    pub outcome: IngestOutcome,
}

fn reject(mode: FormatMode, issue: Issue) -> RowOutcome {
    match mode.row_severity() {
        Severity::Fatal => RowOutcome::RejectFatal(issue),
        Severity::Warning => RowOutcome::SkipWarn(issue),
    }
}

fn parse_value(field: &str) -> std::result::Result<f64, Issue> {
    let value: f64 = field.parse().map_err(|_| Issue::NotNumeric)?;
    if !value.is_finite() {
        return Err(Issue::NotNumeric);
    }
    if value < 0.0 {
        return Err(Issue::Negative);
    }
    Ok(value)
}

/// Classify one row against the rows accepted so far
///
/// Checks run in order and the first failure decides: column count, empty
/// fields, numeric values (gold standard), duplicates, weight consistency
/// (gold standard).
pub fn classify(fields: &[String], line: u64, mode: FormatMode, store: &AnnotationStore) -> RowOutcome {
    let expected = mode.expected_columns();
    if fields.len() != expected {
        return reject(
            mode,
            Issue::ColumnCount {
                expected,
                found: fields.len(),
            },
        );
    }

    if fields.iter().any(String::is_empty) {
        return reject(mode, Issue::EmptyField);
    }

    let test_case = &fields[0];
    let item = &fields[1];

    match mode {
        FormatMode::Candidate => {
            if store.has_item(test_case, item) {
                return RowOutcome::SkipWarn(Issue::DuplicateItem);
            }
            RowOutcome::Accept(ParsedRow {
                test_case: test_case.clone(),
                item: item.clone(),
                aspect: RANKING_ASPECT.to_string(),
                value: line as f64,
                weight: None,
            })
        }
        FormatMode::Reference => {
            let value = match parse_value(&fields[2]) {
                Ok(value) => value,
                Err(issue) => return RowOutcome::RejectFatal(issue),
            };
            let aspect = &fields[3];
            let weight = match parse_value(&fields[4]) {
                Ok(weight) => weight,
                Err(issue) => return RowOutcome::RejectFatal(issue),
            };

            if store.relevance(test_case, item, aspect).is_some() {
                return RowOutcome::RejectFatal(Issue::DuplicateItemAspect);
            }

            let row = ParsedRow {
                test_case: test_case.clone(),
                item: item.clone(),
                aspect: aspect.clone(),
                value,
                weight: Some(weight),
            };

            match store.aspect_weight(test_case, aspect) {
                Some(kept) if kept != weight => RowOutcome::AcceptIgnoringWeight { row, kept },
                _ => RowOutcome::Accept(row),
            }
        }
    }
}

/// Validate rows and build a store from them
pub fn ingest(source: &str, batch: &RecordBatch, mode: FormatMode) -> Ingestion {
    info!("Parsing {} file {}", mode, source);

    let mut store = AnnotationStore::new(source, mode);
    let mut outcome = IngestOutcome::default();
    let mut wrong_column_rows = 0usize;

    let diagnostic = |line: Option<u64>, severity: Severity, issue: Issue| Diagnostic {
        source: source.to_string(),
        line,
        severity,
        issue,
    };

    for Record { line, fields } in &batch.records {
        match classify(fields, *line, mode, &store) {
            RowOutcome::Accept(row) => store.insert(&row),
            RowOutcome::AcceptIgnoringWeight { row, kept } => {
                let ignored = row.weight.unwrap_or(kept);
                outcome.push(diagnostic(
                    Some(*line),
                    Severity::Warning,
                    Issue::ConflictingWeight { kept, ignored },
                ));
                store.insert(&row);
            }
            RowOutcome::SkipWarn(issue) => {
                if matches!(issue, Issue::ColumnCount { .. }) {
                    wrong_column_rows += 1;
                }
                outcome.push(diagnostic(Some(*line), Severity::Warning, issue));
            }
            RowOutcome::RejectFatal(issue) => {
                if matches!(issue, Issue::ColumnCount { .. }) {
                    wrong_column_rows += 1;
                }
                outcome.push(diagnostic(Some(*line), Severity::Fatal, issue));
            }
        }
    }

    if let Some(malformed) = &batch.malformed {
        outcome.push(diagnostic(
            Some(malformed.line),
            Severity::Fatal,
            Issue::Malformed(malformed.reason.clone()),
        ));
    }

    if batch.records.is_empty() {
        if batch.malformed.is_none() {
            outcome.push(diagnostic(None, Severity::Fatal, Issue::EmptyFile));
        }
    } else if wrong_column_rows == batch.records.len() {
        outcome.push(diagnostic(
            None,
            Severity::Fatal,
            Issue::AllRowsMalformed {
                expected: mode.expected_columns(),
            },
        ));
    }

    info!(
        "Parsed {} {}: {} test cases, {} warnings, {} errors",
        store.mode(),
        source,
        store.test_case_count(),
        outcome.warnings().count(),
        outcome.fatal().count()
    );

    Ingestion { store, outcome }
}

/// Read a TSV file and ingest it
///
/// # Errors
/// Returns `Error::Io` when the file cannot be opened. Format anomalies are
/// reported in the returned outcome instead.
pub fn ingest_file(path: &Path, mode: FormatMode) -> Result<Ingestion> {
    let batch = tabular::read_records(path)?;
    Ok(ingest(&path.display().to_string(), &batch, mode))
}
