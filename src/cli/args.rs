//! Command-line argument definitions for the vacancy statistics tool
//!
//! Defines the CLI interface using the clap derive API.

use crate::aggregate::MetricsOptions;
use crate::config::{RateSource, StatsConfig};
use crate::constants::{
    DEFAULT_LOG_LEVEL, DEFAULT_SHARE_THRESHOLD, DEFAULT_TOP_N, QUIET_LOG_LEVEL, SHARD_FILE_PATTERN,
    VERBOSE_LOG_LEVEL,
};
use crate::error::{Result, StatsError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the vacancy salary statistics tool
///
/// Computes year-over-year and city-level salary statistics over a directory
/// of job-posting tables, one shard per worker.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vacancy-stats",
    version,
    about = "Parallel salary statistics over partitioned job-posting tables",
    long_about = "Reads a directory of job-posting CSV shards in parallel, normalizes salaries \
                  into roubles and reports average salary and vacancy counts per year (overall \
                  and for a profession filter) plus the top cities by salary and by share."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase logging verbosity
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show warnings and errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress progress output and informational logging"
    )]
    pub quiet: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Compute statistics over a directory of shards
    Stats(StatsArgs),
    /// Split one table into per-year shard files
    Split(SplitArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct StatsArgs {
    /// Directory holding the shard files
    #[arg(value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Profession name substring for the filtered series
    #[arg(
        short = 'f',
        long = "filter",
        value_name = "NAME",
        default_value = "",
        help = "Case-sensitive substring of the vacancy name"
    )]
    pub name_filter: String,

    /// Concurrent shard workers; defaults to the number of CPU cores
    #[arg(short = 'w', long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Month-keyed currency rate table instead of the built-in rates
    #[arg(long = "rates", value_name = "FILE")]
    pub rates: Option<PathBuf>,

    /// Also write the statistics as JSON
    #[arg(long = "json", value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Glob pattern selecting shard files inside DIR
    #[arg(long = "pattern", value_name = "GLOB", default_value = SHARD_FILE_PATTERN)]
    pub pattern: String,

    /// Minimum share of all vacancies a city needs to be ranked
    #[arg(long = "share-threshold", value_name = "FRACTION", default_value_t = DEFAULT_SHARE_THRESHOLD)]
    pub share_threshold: f64,

    /// Length of each city ranking
    #[arg(long = "top", value_name = "N", default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,
}

#[derive(Debug, Clone, Parser)]
pub struct SplitArgs {
    /// Monolithic table to split
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Directory receiving one `<year>.csv` per publication year
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: PathBuf,
}

impl Args {
    /// Log level derived from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            QUIET_LOG_LEVEL
        } else {
            match self.verbose {
                0 => DEFAULT_LOG_LEVEL,
                1 => VERBOSE_LOG_LEVEL,
                _ => "trace",
            }
        }
    }

    /// Progress bars are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl StatsArgs {
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(StatsError::configuration(
                "Number of workers must be greater than 0",
            ));
        }
        if let Some(rates) = &self.rates {
            if !rates.is_file() {
                return Err(StatsError::configuration(format!(
                    "Rate table does not exist: {}",
                    rates.display()
                )));
            }
        }
        Ok(())
    }

    /// Build the run configuration these arguments describe
    pub fn to_config(&self, show_progress: bool) -> StatsConfig {
        let mut config = StatsConfig::default()
            .with_name_filter(self.name_filter.as_str())
            .with_shard_pattern(self.pattern.as_str())
            .with_metrics(MetricsOptions {
                share_threshold: self.share_threshold,
                top_n: self.top_n,
                ..MetricsOptions::default()
            })
            .with_progress(show_progress);
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(rates) = &self.rates {
            config = config.with_rates(RateSource::History(rates.clone()));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stats_command() {
        let args = Args::try_parse_from([
            "vacancy-stats",
            "stats",
            "chunks",
            "--filter",
            "Программист",
            "--workers",
            "3",
            "--json",
            "out.json",
        ])
        .unwrap();

        let Some(Commands::Stats(stats)) = &args.command else {
            panic!("Expected stats command");
        };
        assert_eq!(stats.input_dir, PathBuf::from("chunks"));
        assert_eq!(stats.name_filter, "Программист");
        assert_eq!(stats.workers, Some(3));
        assert_eq!(stats.json, Some(PathBuf::from("out.json")));
        assert_eq!(stats.pattern, "*.csv");

        let config = stats.to_config(false);
        assert_eq!(config.workers, 3);
        assert_eq!(config.name_filter, "Программист");
        assert_eq!(config.rates, RateSource::Fixed);
        assert_eq!(config.metrics, MetricsOptions::default());
    }

    #[test]
    fn test_parse_split_command() {
        let args =
            Args::try_parse_from(["vacancy-stats", "split", "all.csv", "--output", "chunks"])
                .unwrap();
        match args.command {
            Some(Commands::Split(split)) => {
                assert_eq!(split.input, PathBuf::from("all.csv"));
                assert_eq!(split.output_dir, PathBuf::from("chunks"));
            }
            other => panic!("Expected split command, got {:?}", other),
        }
    }

    #[test]
    fn test_log_levels() {
        let quiet = Args::try_parse_from(["vacancy-stats", "-q", "stats", "d"]).unwrap();
        assert_eq!(quiet.get_log_level(), "warn");
        assert!(!quiet.show_progress());

        let verbose = Args::try_parse_from(["vacancy-stats", "stats", "d", "-vv"]).unwrap();
        assert_eq!(verbose.get_log_level(), "trace");

        let default = Args::try_parse_from(["vacancy-stats", "stats", "d"]).unwrap();
        assert_eq!(default.get_log_level(), "info");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["vacancy-stats", "-q", "-v", "stats", "d"]).is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let args = Args::try_parse_from(["vacancy-stats", "stats", "d", "-w", "0"]).unwrap();
        let Some(Commands::Stats(stats)) = args.command else {
            panic!("Expected stats command");
        };
        assert!(stats.validate().is_err());
    }
}
