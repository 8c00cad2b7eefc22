//! Shard discovery
//!
//! Lists the shard files of an input directory (typically one file per
//! publication year) matching the configured glob pattern.

use crate::error::{Result, StatsError};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Shard discovery for one input directory
#[derive(Debug, Clone)]
pub struct ShardDiscovery {
    input_dir: PathBuf,
    pattern: String,
}

impl ShardDiscovery {
    pub fn new(input_dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            input_dir: input_dir.into(),
            pattern: pattern.into(),
        }
    }

    /// Find every shard file, sorted by path.
    ///
    /// Fails with [`StatsError::ShardsNotFound`] when the directory is missing
    /// or holds no matching files.
    pub async fn discover_shards(&self) -> Result<Vec<PathBuf>> {
        let is_dir = fs::metadata(&self.input_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(StatsError::ShardsNotFound {
                path: self.input_dir.clone(),
            });
        }

        let full_pattern = shard_glob(&self.input_dir, &self.pattern);
        debug!("Searching for shards matching: {}", full_pattern);

        let entries = glob::glob(&full_pattern).map_err(|e| {
            StatsError::configuration(format!("invalid shard pattern '{}': {}", self.pattern, e))
        })?;

        let mut shards = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| {
                StatsError::unreadable(e.path().to_path_buf(), e.error().to_string())
            })?;
            if path.is_file() {
                shards.push(path);
            }
        }
        shards.sort();

        if shards.is_empty() {
            return Err(StatsError::ShardsNotFound {
                path: self.input_dir.clone(),
            });
        }

        debug!(
            "Found {} shards in {}",
            shards.len(),
            self.input_dir.display()
        );
        Ok(shards)
    }
}

/// Join a directory and a file pattern, escaping glob syntax in the directory
fn shard_glob(dir: &Path, pattern: &str) -> String {
    let escaped_dir = Pattern::escape(&dir.to_string_lossy());
    format!("{}/{}", escaped_dir.trim_end_matches('/'), pattern)
}
