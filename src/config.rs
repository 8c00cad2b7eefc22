//! Configuration management and validation.
//!
//! Provides the run configuration consumed by the statistics processor:
//! pool size, name filter, shard discovery pattern, ranking options and the
//! currency rate source.

use crate::aggregate::MetricsOptions;
use crate::constants::SHARD_FILE_PATTERN;
use crate::error::{Result, StatsError};
use crate::rates::{FixedRates, RateHistory, RateTable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Where currency multipliers come from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum RateSource {
    /// Built-in constant table
    #[default]
    Fixed,
    /// Month-keyed history table on disk
    History(PathBuf),
}

impl RateSource {
    /// Build the rate table this source describes
    pub fn load(&self) -> Result<Arc<dyn RateTable>> {
        let table: Arc<dyn RateTable> = match self {
            RateSource::Fixed => Arc::new(FixedRates::default()),
            RateSource::History(path) => Arc::new(RateHistory::load(path)?),
        };
        Ok(table)
    }
}

/// Global configuration for a statistics run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Number of shards processed concurrently; capped at the hardware parallelism
    pub workers: usize,

    /// Case-sensitive substring selecting the filtered series; empty matches all
    pub name_filter: String,

    /// Glob pattern selecting shard files inside the input directory
    pub shard_pattern: String,

    /// City ranking options
    pub metrics: MetricsOptions,

    /// Currency rate source
    pub rates: RateSource,

    /// Show a progress bar while shards are processed
    pub show_progress: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            name_filter: String::new(),
            shard_pattern: SHARD_FILE_PATTERN.to_string(),
            metrics: MetricsOptions::default(),
            rates: RateSource::Fixed,
            show_progress: false,
        }
    }
}

impl StatsConfig {
    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_name_filter(mut self, name_filter: impl Into<String>) -> Self {
        self.name_filter = name_filter.into();
        self
    }

    pub fn with_shard_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.shard_pattern = pattern.into();
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsOptions) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_rates(mut self, rates: RateSource) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Pool size actually used: at least one, never above the core count
    pub fn effective_workers(&self) -> usize {
        let cores = num_cpus::get().max(1);
        let workers = self.workers.clamp(1, cores);
        if workers != self.workers {
            debug!(
                "Requested {} workers, using {} ({} cores available)",
                self.workers, workers, cores
            );
        }
        workers
    }

    /// Reject settings no run could use
    pub fn validate(&self) -> Result<()> {
        if self.shard_pattern.trim().is_empty() {
            return Err(StatsError::configuration("shard pattern must not be empty"));
        }
        if !(0.0..=1.0).contains(&self.metrics.share_threshold) {
            return Err(StatsError::configuration(format!(
                "share threshold {} is outside [0, 1]",
                self.metrics.share_threshold
            )));
        }
        if self.metrics.top_n == 0 {
            return Err(StatsError::configuration("top-N must be at least 1"));
        }
        Ok(())
    }
}
