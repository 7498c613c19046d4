//! Error handling for the quality report pipeline.
//!
//! File-level and reference-table problems surface as [`ReportError`] and abort
//! the run. Row-level problems never become errors; they are collected into the
//! validation report instead.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Errors that can abort a report run
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error decoding CSV data into Arrow batches
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error writing the Parquet dataset snapshot
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error converting between typed rows and record batches
    #[error("Serde arrow error: {0}")]
    SerdeArrow(#[from] serde_arrow::Error),

    /// Error serializing chart or metadata documents
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Source filename does not start with a zero-padded `MM.DD.YYYY` token
    #[error("CSV filename requires a zero padded MM.DD.YYYY date, got {token:?} in {}", path.display())]
    MalformedFilenameDate {
        /// Offending source file
        path: PathBuf,
        /// The token that failed to parse
        token: String,
    },

    /// A required reference table does not exist
    #[error("Reference table not found: {}", .0.display())]
    MissingReferenceTable(PathBuf),

    /// A required column is missing from a CSV file
    #[error("Column '{column}' not found in {}", path.display())]
    MissingColumn {
        /// File that lacks the column
        path: PathBuf,
        /// Name of the missing column
        column: String,
    },

    /// A reference table contains the same key twice
    #[error("Duplicate key {key:?} in reference table {}", path.display())]
    DuplicateReferenceKey {
        /// Reference table path
        path: PathBuf,
        /// Repeated key
        key: String,
    },

    /// A reference table row is missing a field or carries an unusable value
    #[error("Invalid reference row for key {key:?}: {reason}")]
    InvalidReferenceRow {
        /// Key of the offending row
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// Two metric codes map to the same metric with different settings
    #[error("Metric '{metric}' is defined inconsistently across its codes")]
    ConflictingMetricDefinition {
        /// Canonical metric name
        metric: String,
    },

    /// An entity needed by a chart task is not in the identity table
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// A metric needed by a chart task is not in the metric table
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// No rows survived ingestion, so there is no current reporting date
    #[error("Dataset is empty after ingestion")]
    EmptyDataset,

    /// Worker pool could not be created
    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;
