//! End-to-end tests for the statistics engine
//!
//! Each test lays out a shard directory in a temp dir and runs the full
//! discover, aggregate, merge and derive pipeline over it.

pub mod basic_processing;

use crate::config::StatsConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HEADER: &str = "name,salary_from,salary_to,salary_currency,area_name,published_at";

/// One vacancy with a single salary figure, published mid-year
pub fn row(name: &str, salary: i64, city: &str, year: i32) -> String {
    format!(
        "{},{},{},RUR,{},{}-06-15T12:00:00+0300",
        name, salary, salary, city, year
    )
}

/// Write a shard holding the header and the given rows
pub fn write_shard(dir: &Path, file_name: &str, rows: &[String]) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(file_name);
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}

/// Shard directory with one file per entry of `shards`
pub fn create_shard_dir(temp_dir: &TempDir, shards: &[Vec<String>]) -> PathBuf {
    let dir = temp_dir.path().join("chunks");
    for (index, rows) in shards.iter().enumerate() {
        write_shard(&dir, &format!("part_{:02}.csv", index), rows);
    }
    dir
}

pub fn test_config(workers: usize, name_filter: &str) -> StatsConfig {
    StatsConfig::default()
        .with_workers(workers)
        .with_name_filter(name_filter)
}
