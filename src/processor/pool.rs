//! Worker pool for shard aggregation
//!
//! Runs one blocking fold per shard on tokio's blocking threads, with at most
//! `workers` shards (and therefore file handles) in flight. Results come back
//! as one batch once every shard has finished; the first shard failure
//! aborts the whole batch.

use crate::aggregate::PartialAggregate;
use crate::error::{Result, StatsError};
use crate::parser::{ParseStats, ShardParser};
use crate::rates::RateTable;

use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;
use tracing::{debug, error};

/// Everything one shard task hands back
#[derive(Debug, Clone)]
pub struct ShardOutcome {
    pub path: PathBuf,
    pub aggregate: PartialAggregate,
    pub stats: ParseStats,
}

/// Parse one shard and fold its records into a fresh partial aggregate
pub fn aggregate_shard(path: &Path, rates: &dyn RateTable, name_filter: &str) -> Result<ShardOutcome> {
    let parser = ShardParser::new(rates);
    let mut aggregate = PartialAggregate::new();
    let stats = parser.parse_file(path, |record| aggregate.write(&record, name_filter))?;

    Ok(ShardOutcome {
        path: path.to_path_buf(),
        aggregate,
        stats,
    })
}

/// Fixed-size pool of shard tasks
#[derive(Debug, Clone)]
pub struct WorkerPool {
    workers: usize,
    rates: Arc<dyn RateTable>,
    name_filter: Arc<str>,
}

impl WorkerPool {
    pub fn new(workers: usize, rates: Arc<dyn RateTable>, name_filter: &str) -> Self {
        Self {
            workers: workers.max(1),
            rates,
            name_filter: Arc::from(name_filter),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Aggregate every shard, returning all outcomes once the last one finishes.
    ///
    /// Outcomes arrive in completion order, not input order.
    pub async fn run(
        &self,
        shards: &[PathBuf],
        progress: Option<&ProgressBar>,
    ) -> Result<Vec<ShardOutcome>> {
        debug!(
            "Dispatching {} shards to {} workers",
            shards.len(),
            self.workers
        );

        stream::iter(shards.iter().cloned())
            .map(|path| {
                let rates = Arc::clone(&self.rates);
                let name_filter = Arc::clone(&self.name_filter);
                async move {
                    let task_path = path.clone();
                    let result = task::spawn_blocking(move || {
                        aggregate_shard(&task_path, rates.as_ref(), &name_filter)
                    })
                    .await
                    .map_err(|e| StatsError::TaskFailed {
                        path: path.clone(),
                        reason: e.to_string(),
                    })
                    .and_then(|inner| inner);

                    if let Some(pb) = progress {
                        pb.inc(1);
                    }

                    match &result {
                        Ok(outcome) => debug!(
                            "Shard finished: {} ({} records)",
                            path.display(),
                            outcome.aggregate.total_count
                        ),
                        Err(e) => error!("Shard failed: {}: {}", path.display(), e),
                    }
                    result
                }
            })
            .buffer_unordered(self.workers)
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::FixedRates;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "name,salary_from,salary_to,salary_currency,area_name,published_at";

    fn write_shard(dir: &TempDir, name: &str, rows: &[&str]) -> PathBuf {
        let path = dir.path().join(name);
        let mut content = String::from(HEADER);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn pool(workers: usize, filter: &str) -> WorkerPool {
        WorkerPool::new(workers, Arc::new(FixedRates::default()), filter)
    }

    #[test]
    fn test_aggregate_shard() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_shard(
            &temp_dir,
            "2021.csv",
            &[
                "Dev,100,100,RUR,X,2021-01-01",
                "QA,200,200,RUR,Y,2021-02-01",
                "broken,row",
            ],
        );

        let outcome = aggregate_shard(&path, &FixedRates::default(), "Dev").unwrap();
        assert_eq!(outcome.path, path);
        assert_eq!(outcome.aggregate.total_count, 2);
        assert_eq!(outcome.aggregate.filtered_count_by_year[&2021], 1);
        assert_eq!(outcome.stats.malformed_rows, 1);
    }

    #[tokio::test]
    async fn test_pool_returns_every_shard() {
        let temp_dir = TempDir::new().unwrap();
        let shards: Vec<PathBuf> = (2015..2023)
            .map(|year| {
                let row = format!("Dev,100,300,RUR,X,{}-05-05", year);
                write_shard(&temp_dir, &format!("{}.csv", year), &[row.as_str()])
            })
            .collect();

        let outcomes = pool(3, "").run(&shards, None).await.unwrap();

        assert_eq!(outcomes.len(), shards.len());
        let mut seen: Vec<PathBuf> = outcomes.into_iter().map(|o| o.path).collect();
        seen.sort();
        assert_eq!(seen, shards);
    }

    #[tokio::test]
    async fn test_pool_fails_fast_on_missing_shard() {
        let temp_dir = TempDir::new().unwrap();
        let good = write_shard(&temp_dir, "2020.csv", &["Dev,1,1,RUR,X,2020-01-01"]);
        let missing = temp_dir.path().join("2021.csv");

        let result = pool(2, "").run(&[good, missing.clone()], None).await;
        match result {
            Err(StatsError::PartitionUnreadable { path, .. }) => assert_eq!(path, missing),
            other => panic!("Expected PartitionUnreadable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_shard_list() {
        let outcomes = pool(4, "").run(&[], None).await.unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_worker_count_is_at_least_one() {
        assert_eq!(pool(0, "").workers(), 1);
    }
}
