//! Year splitter
//!
//! Partitions one monolithic vacancy table into per-year shard files that
//! the statistics run can then process in parallel. Rows keep their original
//! field order and every output file repeats the input header.

use crate::constants::{UTF8_BOM, YEAR_PREFIX_LEN, columns};
use crate::error::{Result, StatsError};
use crate::parser::column_mapping::normalize_header;
use crate::parser::record_parser::validate_row;

use csv::{StringRecord, Writer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info};

/// Outcome of a split
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SplitSummary {
    pub rows_read: usize,
    pub rows_dropped: usize,
    /// Rows written per year file
    pub rows_by_year: BTreeMap<i32, usize>,
}

/// Write every valid row of `input` to `<output_dir>/<year>.csv`.
///
/// Rows failing the field-count or empty-field check, or whose
/// `published_at` does not start with a four-digit year, are dropped.
pub fn split_by_year(input: &Path, output_dir: &Path) -> Result<SplitSummary> {
    let file = File::open(input)
        .map_err(|e| StatsError::unreadable(input, format!("failed to open: {}", e)))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| StatsError::unreadable(input, format!("failed to read header: {}", e)))?
        .iter()
        .map(|h| h.trim_start_matches(UTF8_BOM))
        .collect();

    let date_index = headers
        .iter()
        .position(|h| normalize_header(h) == columns::PUBLISHED_AT)
        .ok_or_else(|| {
            StatsError::unreadable(
                input,
                format!("header lacks required column: {}", columns::PUBLISHED_AT),
            )
        })?;

    fs::create_dir_all(output_dir)?;

    let mut writers: BTreeMap<i32, Writer<File>> = BTreeMap::new();
    let mut summary = SplitSummary::default();

    for result in reader.records() {
        summary.rows_read += 1;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                debug!("Unreadable row {}: {}", summary.rows_read, e);
                summary.rows_dropped += 1;
                continue;
            }
        };

        let year = validate_row(&row, headers.len())
            .ok()
            .and_then(|_| row_year(&row, date_index));
        let Some(year) = year else {
            summary.rows_dropped += 1;
            continue;
        };

        let writer = match writers.entry(year) {
            std::collections::btree_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::btree_map::Entry::Vacant(entry) => {
                let path = output_dir.join(format!("{}.csv", year));
                debug!("Creating shard {}", path.display());
                let mut writer = Writer::from_path(&path)?;
                writer.write_record(&headers)?;
                entry.insert(writer)
            }
        };
        writer.write_record(&row)?;
        *summary.rows_by_year.entry(year).or_default() += 1;
    }

    for writer in writers.values_mut() {
        writer.flush()?;
    }

    info!(
        "Split {} rows from {} into {} year shards ({} dropped)",
        summary.rows_read,
        input.display(),
        summary.rows_by_year.len(),
        summary.rows_dropped
    );
    Ok(summary)
}

fn row_year(row: &StringRecord, date_index: usize) -> Option<i32> {
    row.get(date_index)?.get(..YEAR_PREFIX_LEN)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const INPUT: &str = "\u{feff}name,salary_from,salary_to,salary_currency,area_name,published_at
Dev,100,200,RUR,Москва,2007-12-03T17:34:36+0300
QA,300,400,USD,Казань,2008-01-10T10:00:00+0300
Broken,,400,USD,Казань,2008-01-10T10:00:00+0300
Short,1
PM,500,600,EUR,Москва,2007-06-01T09:00:00+0300
Odd,1,2,RUR,Москва,unknown
";

    #[test]
    fn test_split_groups_rows_by_year() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("vacancies.csv");
        std::fs::write(&input, INPUT).unwrap();
        let output = temp_dir.path().join("chunks");

        let summary = split_by_year(&input, &output).unwrap();

        assert_eq!(summary.rows_read, 6);
        assert_eq!(summary.rows_dropped, 3);
        assert_eq!(summary.rows_by_year, BTreeMap::from([(2007, 2), (2008, 1)]));

        let shard_2007 = std::fs::read_to_string(output.join("2007.csv")).unwrap();
        let lines: Vec<&str> = shard_2007.lines().collect();
        assert_eq!(
            lines[0],
            "name,salary_from,salary_to,salary_currency,area_name,published_at"
        );
        assert_eq!(lines[1], "Dev,100,200,RUR,Москва,2007-12-03T17:34:36+0300");
        assert_eq!(lines[2], "PM,500,600,EUR,Москва,2007-06-01T09:00:00+0300");
        assert_eq!(lines.len(), 3);

        assert!(output.join("2008.csv").exists());
        assert!(!output.join("unknown.csv").exists());
    }

    #[test]
    fn test_split_requires_published_at() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("vacancies.csv");
        std::fs::write(&input, "name,salary_from\nDev,100\n").unwrap();

        let result = split_by_year(&input, &temp_dir.path().join("out"));
        assert!(matches!(result, Err(StatsError::PartitionUnreadable { .. })));
    }

    #[test]
    fn test_split_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let result = split_by_year(
            &temp_dir.path().join("missing.csv"),
            &temp_dir.path().join("out"),
        );
        assert!(matches!(result, Err(StatsError::PartitionUnreadable { .. })));
    }
}
