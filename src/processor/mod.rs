//! Statistics engine
//!
//! Orchestrates a complete run: shard discovery, parallel per-shard
//! aggregation, the global merge and the derived metrics. Every shard must
//! finish before anything is merged, so a single unreadable shard fails the
//! run without producing partial statistics.

pub mod discovery;
pub mod pool;
pub mod splitter;

#[cfg(test)]
pub mod tests;

use self::discovery::ShardDiscovery;
use self::pool::{ShardOutcome, WorkerPool};

use crate::aggregate::{DerivedStats, GlobalAggregate};
use crate::config::StatsConfig;
use crate::error::Result;
use crate::parser::ParseStats;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Bookkeeping for one statistics run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub shards_processed: usize,
    pub workers: usize,
    /// Row counters summed over every shard
    pub parse: ParseStats,
    pub elapsed_ms: u128,
}

impl RunSummary {
    pub fn rows_read(&self) -> usize {
        self.parse.total_rows
    }

    pub fn rows_dropped(&self) -> usize {
        self.parse.rows_dropped()
    }
}

/// Statistics plus the summary of the run that produced them
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub stats: DerivedStats,
    pub summary: RunSummary,
}

/// Runs the parse, aggregate, merge and derive pipeline
#[derive(Debug, Clone)]
pub struct StatsProcessor {
    config: StatsConfig,
}

impl StatsProcessor {
    pub fn new(config: StatsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    /// Discover the shards under `input_dir` and process all of them
    pub async fn process_directory(&self, input_dir: &Path) -> Result<StatsReport> {
        self.config.validate()?;

        let discovery = ShardDiscovery::new(input_dir, self.config.shard_pattern.as_str());
        let shards = discovery.discover_shards().await?;
        info!(
            "Found {} shards in {}",
            shards.len(),
            input_dir.display()
        );

        self.process_shards(&shards).await
    }

    /// Process an explicit list of shard files
    pub async fn process_shards(&self, shards: &[PathBuf]) -> Result<StatsReport> {
        let start_time = Instant::now();
        self.config.validate()?;

        let rates = self.config.rates.load()?;
        let workers = self.config.effective_workers();
        let pool = WorkerPool::new(workers, rates, &self.config.name_filter);

        let progress = self
            .config
            .show_progress
            .then(|| shard_progress_bar(shards.len()));

        info!(
            "Aggregating {} shards with {} workers",
            shards.len(),
            pool.workers()
        );
        let outcomes = pool.run(shards, progress.as_ref()).await;

        if let Some(pb) = &progress {
            match &outcomes {
                Ok(_) => pb.finish_with_message("Shards aggregated"),
                Err(_) => pb.abandon_with_message("Aggregation failed"),
            }
        }
        let outcomes = outcomes?;

        let (global, parse) = merge_outcomes(outcomes);
        if parse.rows_dropped() > 0 {
            warn!(
                "Dropped {} of {} rows ({} malformed, {} unknown currency)",
                parse.rows_dropped(),
                parse.total_rows,
                parse.malformed_rows,
                parse.unknown_currency_rows
            );
        }

        let stats = DerivedStats::compute(&global, &self.config.name_filter, &self.config.metrics)?;

        let summary = RunSummary {
            shards_processed: global.partials(),
            workers: pool.workers(),
            parse,
            elapsed_ms: start_time.elapsed().as_millis(),
        };
        info!(
            "Processed {} records from {} shards in {}ms",
            global.total_count(),
            summary.shards_processed,
            summary.elapsed_ms
        );

        Ok(StatsReport { stats, summary })
    }
}

/// Fold every shard outcome into one aggregate and one set of row counters
fn merge_outcomes(outcomes: Vec<ShardOutcome>) -> (GlobalAggregate, ParseStats) {
    let mut parse = ParseStats::new();
    let partials: Vec<_> = outcomes
        .into_iter()
        .map(|outcome| {
            parse = std::mem::take(&mut parse).merge(outcome.stats);
            outcome.aggregate
        })
        .collect();
    (GlobalAggregate::merge_all(partials), parse)
}

fn shard_progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
    {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(e) => warn!("Progress bar template rejected: {}", e),
    }
    pb.set_message("Aggregating shards");
    pb
}
