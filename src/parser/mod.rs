//! CSV shard parser for job-posting tables
//!
//! Turns the rows of one shard into typed [`Record`](crate::models::Record)s.
//!
//! ## Architecture
//!
//! - [`shard_parser`] - File handling and the per-shard row loop
//! - [`column_mapping`] - Header analysis, resolves required columns to indices
//! - [`record_parser`] - Row validation and record construction
//! - [`stats`] - Per-shard counters for accepted and dropped rows
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vacancy_stats::parser::ShardParser;
//! use vacancy_stats::rates::FixedRates;
//!
//! # fn example() -> vacancy_stats::Result<()> {
//! let rates = FixedRates::default();
//! let parser = ShardParser::new(&rates);
//! let mut total = 0.0;
//! let stats = parser.parse_file(std::path::Path::new("2022.csv"), |record| {
//!     total += record.salary;
//! })?;
//!
//! println!("{} of {} rows parsed", stats.records_parsed, stats.total_rows);
//! # Ok(())
//! # }
//! ```

pub mod column_mapping;
pub mod shard_parser;
pub mod record_parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use column_mapping::ColumnMapping;
pub use shard_parser::ShardParser;
pub use stats::ParseStats;
