//! Error types for the abcheck library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for abcheck operations.
#[derive(Debug, Error)]
pub enum AbError {
    /// Error reading or accessing a local file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error fetching a remote source.
    #[error("HTTP error for '{url}': {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Remote source answered with a non-success status.
    #[error("HTTP status {status} for '{url}'")]
    HttpStatus { url: String, status: u16 },

    /// Error parsing CSV data at a known position.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty source or no columns to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// None of the candidate value columns exist in the source.
    #[error("Could not find a valid order value column in {source_name}. Checked for {candidates}")]
    ColumnNotFound {
        source_name: String,
        candidates: String,
    },

    /// A value column holds a cell that cannot be read as a number.
    #[error("Column '{column}' is not numeric: row {row} holds '{value}'")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// Values too large for the statistic to stay finite.
    #[error("Numeric overflow: {0}")]
    NumericOverflow(String),

    /// Too few values to run a statistical test.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for abcheck operations.
pub type Result<T> = std::result::Result<T, AbError>;
