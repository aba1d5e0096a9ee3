//! # RBU Common Library
//!
//! Shared code for the Rank-Biased Utility evaluation tools:
//! - Tab-separated record reading
//! - Gold standard / system output validation and ingestion
//! - Annotation store (relevance, aspect weights, rankings)
//! - Ideal ranking extraction
//! - RBU metric evaluation and result aggregation
//! - Configuration loading

pub mod config;
pub mod error;
pub mod format;
pub mod ranking;
pub mod rbu;
pub mod result;
pub mod store;
pub mod tabular;

pub use error::{Error, Result};
pub use format::{ingest, ingest_file, FormatMode, IngestOutcome, Ingestion};
pub use rbu::{RbuEvaluator, RbuParameters};
pub use result::{aggregate, EvaluationResult};
pub use store::AnnotationStore;
