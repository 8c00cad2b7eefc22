//! Vacancy Statistics Library
//!
//! Parallel salary statistics over job-posting tables split into shards
//! (typically one CSV file per publication year).
//!
//! This library provides tools for:
//! - Parsing shard files into salary-normalized records
//! - Folding each shard into a mergeable partial aggregate on its own worker
//! - Merging partials into one global aggregate, order-independently
//! - Deriving yearly salary and count series and city rankings
//! - Splitting a monolithic table into per-year shards

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod processor;
pub mod rates;
pub mod report;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use aggregate::{DerivedStats, GlobalAggregate, Merge, MetricsOptions, PartialAggregate};
pub use config::{RateSource, StatsConfig};
pub use error::{Result, RowError, StatsError};
pub use models::{Record, RecordField};
pub use processor::splitter::{SplitSummary, split_by_year};
pub use processor::{RunSummary, StatsProcessor, StatsReport};
pub use rates::{FixedRates, RateHistory, RateKey, RateTable};
