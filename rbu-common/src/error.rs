//! Common error types for RBU evaluation
//!
//! Format problems found while reading a gold standard or system output are
//! not errors: they are collected as diagnostics in an `IngestOutcome`.
//! This type only covers failures that stop a component from running at all.

use thiserror::Error;

/// Common result type for RBU operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the RBU crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tabular reader or writer error (wraps csv::Error)
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metric parameter out of its valid range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// JSON serialization error (wraps serde_json::Error)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
