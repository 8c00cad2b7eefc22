//! Parsing statistics for shard processing
//!
//! Row-level drops never abort a shard; they are tallied here so a run can
//! report how much input was discarded and why.

use crate::constants::MAX_RECORDED_ROW_ERRORS;
use crate::error::RowError;
use serde::{Deserialize, Serialize};

/// Per-shard (and, once merged, per-run) row counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Data rows encountered, header excluded
    pub total_rows: usize,

    /// Rows turned into records
    pub records_parsed: usize,

    /// Rows dropped for field-count mismatch, empty or unparseable fields
    pub malformed_rows: usize,

    /// Rows dropped because their currency has no rate
    pub unknown_currency_rows: usize,

    /// First few drop reasons, for debugging
    pub errors: Vec<String>,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a dropped row under the matching category
    pub fn record_drop(&mut self, row_number: usize, error: &RowError) {
        if error.is_malformed() {
            self.malformed_rows += 1;
        } else {
            self.unknown_currency_rows += 1;
        }
        self.push_error(format!("Row {}: {}", row_number, error));
    }

    /// Count a row the CSV reader itself could not decode
    pub fn record_unreadable(&mut self, row_number: usize, message: impl std::fmt::Display) {
        self.malformed_rows += 1;
        self.push_error(format!("CSV error at row {}: {}", row_number, message));
    }

    fn push_error(&mut self, message: String) {
        if self.errors.len() < MAX_RECORDED_ROW_ERRORS {
            self.errors.push(message);
        }
    }

    /// Total rows dropped for any reason
    pub fn rows_dropped(&self) -> usize {
        self.malformed_rows + self.unknown_currency_rows
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / self.total_rows as f64) * 100.0
        }
    }

    /// Combine counters from another shard
    pub fn merge(mut self, other: ParseStats) -> Self {
        self.total_rows += other.total_rows;
        self.records_parsed += other.records_parsed;
        self.malformed_rows += other.malformed_rows;
        self.unknown_currency_rows += other.unknown_currency_rows;
        for message in other.errors {
            self.push_error(message);
        }
        self
    }
}
