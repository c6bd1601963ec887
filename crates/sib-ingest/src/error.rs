//! Error types for CSV sources and targets.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing CSV files.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to open or create the file.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Malformed row or I/O failure while reading.
    #[error("failed to read CSV {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// I/O failure while writing.
    #[error("failed to write CSV {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Flushing the written file failed.
    #[error("failed to write CSV {path}: {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file has no header row.
    #[error("CSV file has no header: {path}")]
    MissingHeader { path: PathBuf },

    /// Reading the records to export failed.
    #[error("reading source records failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for CSV operations.
pub type Result<T> = std::result::Result<T, IngestError>;
