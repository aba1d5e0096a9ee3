//! Tab-separated record source
//!
//! Both input formats are headerless TSV files with an optional `"` text
//! qualifier. Field counts are not checked here: rows are handed to the
//! format validator as-is, which decides what a bad row means for each mode.

use crate::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One row of string fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based record counter, the number reported in diagnostics
    pub line: u64,
    pub fields: Vec<String>,
}

impl Record {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }
}

/// A record the reader could not decode (bad quoting, invalid UTF-8)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Malformed {
    pub line: u64,
    pub reason: String,
}

/// Records read from one source
///
/// Reading stops at the first undecodable record; everything before it is kept.
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub records: Vec<Record>,
    pub malformed: Option<Malformed>,
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(b'\t')
        .quote(b'"')
        .has_headers(false)
        .flexible(true);
    builder
}

/// Read every record of a TSV file
///
/// # Errors
/// Returns `Error::Io` when the file cannot be opened.
pub fn read_records(path: &Path) -> Result<RecordBatch> {
    let file = File::open(path)?;
    Ok(read_records_from(file))
}

/// Read every record from any byte source
pub fn read_records_from<R: Read>(reader: R) -> RecordBatch {
    let mut rdr = reader_builder().from_reader(reader);
    let mut batch = RecordBatch::default();

    for (index, result) in rdr.records().enumerate() {
        let line = index as u64 + 1;
        match result {
            Ok(record) => {
                let fields = record.iter().map(str::to_string).collect();
                batch.records.push(Record::new(line, fields));
            }
            Err(e) => {
                batch.malformed = Some(Malformed {
                    line,
                    reason: e.to_string(),
                });
                break;
            }
        }
    }

    batch
}
