//! Core shard parser implementation
//!
//! Streams the rows of one shard file through the record parser, handing
//! every accepted record to a caller-supplied visitor so nothing is
//! buffered beyond the current row.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use super::column_mapping::ColumnMapping;
use super::record_parser::parse_record;
use super::stats::ParseStats;
use crate::error::{Result, StatsError};
use crate::models::Record;
use crate::rates::RateTable;

/// Parser for delimited job-posting shards
#[derive(Debug, Clone, Copy)]
pub struct ShardParser<'a> {
    rates: &'a dyn RateTable,
}

impl<'a> ShardParser<'a> {
    pub fn new(rates: &'a dyn RateTable) -> Self {
        Self { rates }
    }

    /// Parse a shard file, calling `visit` for each accepted record
    pub fn parse_file<F>(&self, path: &Path, visit: F) -> Result<ParseStats>
    where
        F: FnMut(Record),
    {
        debug!("Parsing shard: {}", path.display());

        let file = File::open(path)
            .map_err(|e| StatsError::unreadable(path, format!("failed to open: {}", e)))?;
        let stats = self.parse_reader(file, path, visit)?;

        info!(
            "Parsed {} records from {} rows in {} ({} dropped)",
            stats.records_parsed,
            stats.total_rows,
            path.display(),
            stats.rows_dropped()
        );
        Ok(stats)
    }

    /// Parse shard content from any reader; `path` labels errors
    pub fn parse_reader<R, F>(&self, reader: R, path: &Path, mut visit: F) -> Result<ParseStats>
    where
        R: Read,
        F: FnMut(Record),
    {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| StatsError::unreadable(path, format!("failed to read header: {}", e)))?
            .clone();
        let mapping = ColumnMapping::analyze(&headers, path)?;

        let mut stats = ParseStats::new();
        for result in csv_reader.records() {
            stats.total_rows += 1;
            let row_number = stats.total_rows;

            match result {
                Ok(row) => match parse_record(&row, &mapping, self.rates) {
                    Ok(record) => {
                        stats.records_parsed += 1;
                        visit(record);
                    }
                    Err(e) => {
                        debug!("Dropped row {} in {}: {}", row_number, path.display(), e);
                        stats.record_drop(row_number, &e);
                    }
                },
                Err(e) => {
                    debug!("Unreadable row {} in {}: {}", row_number, path.display(), e);
                    stats.record_unreadable(row_number, e);
                }
            }
        }

        Ok(stats)
    }
}
