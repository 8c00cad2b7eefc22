//! Error handling for statistics runs.
//!
//! Two layers: [`StatsError`] aborts a whole run (fail-fast shard failures,
//! empty datasets, bad configuration), while [`RowError`] describes why a
//! single row was dropped and never escapes the shard that produced it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No shard files found at path: {path}")]
    ShardsNotFound { path: PathBuf },

    #[error("Shard unreadable: {path} - {reason}")]
    PartitionUnreadable { path: PathBuf, reason: String },

    #[error("No valid records found across {shards} shards")]
    EmptyDataset { shards: usize },

    #[error("Invalid rate table {path}: {reason}")]
    RateTable { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Shard task failed for {path}: {reason}")]
    TaskFailed { path: PathBuf, reason: String },
}

impl StatsError {
    /// Shorthand for a shard that cannot be opened or has an unusable header
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::PartitionUnreadable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Reasons a single row is rejected by the record parser
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("expected {expected} fields, found {found}")]
    Malformed { expected: usize, found: usize },

    #[error("empty value in column {column}")]
    EmptyField { column: usize },

    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },

    #[error("unknown currency code '{currency}'")]
    UnknownCurrency { currency: String },
}

impl RowError {
    /// Field-count and empty-field problems, as opposed to rate lookups
    pub fn is_malformed(&self) -> bool {
        !matches!(self, RowError::UnknownCurrency { .. })
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
