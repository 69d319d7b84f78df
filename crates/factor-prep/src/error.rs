//! Error types for panel preparation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for preparation operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Errors that can occur while loading, labeling or reshaping a panel.
#[derive(Debug, Error)]
pub enum PrepError {
    /// Input file does not exist
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Missing required column in input data
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The same (date, entity) pair occurs more than once
    #[error("Duplicate observation for stock_id {stock_id} on {date}")]
    DuplicateKey {
        /// Date of the repeated observation
        date: String,
        /// Entity of the repeated observation
        stock_id: String,
    },

    /// Invalid date range
    #[error("Invalid date range: start {start} is not before end {end}")]
    InvalidDateRange {
        /// Exclusive lower bound
        start: String,
        /// Exclusive upper bound
        end: String,
    },

    /// Rows without a date cannot be assigned to either side of a split
    #[error("{0} rows have no date")]
    NullDates(usize),

    /// Malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
