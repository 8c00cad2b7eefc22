//! Basic processing tests

use super::{create_shard_dir, row, test_config, write_shard};
use crate::processor::StatsProcessor;
use std::collections::BTreeMap;
use tempfile::TempDir;

fn two_shard_dataset(temp_dir: &TempDir) -> std::path::PathBuf {
    create_shard_dir(
        temp_dir,
        &[
            vec![
                row("Программист", 100, "X", 2021),
                row("Аналитик", 200, "Y", 2021),
                row("Программист", 300, "X", 2022),
            ],
            vec![row("Программист", 400, "X", 2021)],
        ],
    )
}

#[tokio::test]
async fn test_two_shard_statistics() {
    let temp_dir = TempDir::new().unwrap();
    let dir = two_shard_dataset(&temp_dir);

    let report = StatsProcessor::new(test_config(2, "Программист"))
        .process_directory(&dir)
        .await
        .unwrap();
    let stats = &report.stats;

    assert_eq!(stats.salary_by_year, BTreeMap::from([(2021, 233), (2022, 300)]));
    assert_eq!(stats.count_by_year, BTreeMap::from([(2021, 3), (2022, 1)]));
    assert_eq!(
        stats.filtered_salary_by_year,
        BTreeMap::from([(2021, 250), (2022, 300)])
    );
    assert_eq!(
        stats.filtered_count_by_year,
        BTreeMap::from([(2021, 2), (2022, 1)])
    );
    assert_eq!(
        stats.top_cities_by_share,
        vec![("X".to_string(), 0.75), ("Y".to_string(), 0.25)]
    );
    assert_eq!(
        stats.top_cities_by_salary,
        vec![("X".to_string(), 266), ("Y".to_string(), 200)]
    );
    assert_eq!(stats.currency_counts, vec![("RUR".to_string(), 4)]);

    assert_eq!(report.summary.shards_processed, 2);
    assert_eq!(report.summary.rows_read(), 4);
    assert_eq!(report.summary.rows_dropped(), 0);
}

#[tokio::test]
async fn test_worker_count_does_not_change_results() {
    let temp_dir = TempDir::new().unwrap();
    let dir = two_shard_dataset(&temp_dir);

    let single = StatsProcessor::new(test_config(1, "Программист"))
        .process_directory(&dir)
        .await
        .unwrap();
    let many = StatsProcessor::new(test_config(8, "Программист"))
        .process_directory(&dir)
        .await
        .unwrap();

    assert_eq!(single.stats, many.stats);
}

#[tokio::test]
async fn test_foreign_currency_is_converted() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("chunks");
    // 10 USD at the built-in rate plus one rouble posting
    write_shard(
        &dir,
        "2010.csv",
        &[
            "Dev,10,10,USD,Москва,2010-03-01T00:00:00+0300".to_string(),
            row("Dev", 100, "Москва", 2010),
        ],
    );

    let report = StatsProcessor::new(test_config(1, ""))
        .process_directory(&dir)
        .await
        .unwrap();

    let usd_rate = crate::constants::DEFAULT_CURRENCY_RATES
        .iter()
        .find(|(code, _)| *code == "USD")
        .map(|(_, rate)| *rate)
        .unwrap();
    let expected = ((10.0 * usd_rate + 100.0) / 2.0) as i64;
    assert_eq!(report.stats.salary_by_year[&2010], expected);
    assert_eq!(report.stats.currency_counts.len(), 2);
}

#[tokio::test]
async fn test_process_explicit_shard_list() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("chunks");
    let first = write_shard(&dir, "2019.csv", &[row("QA", 50, "Омск", 2019)]);
    write_shard(&dir, "2020.csv", &[row("QA", 70, "Омск", 2020)]);

    let report = StatsProcessor::new(test_config(2, ""))
        .process_shards(&[first])
        .await
        .unwrap();

    assert_eq!(report.stats.count_by_year, BTreeMap::from([(2019, 1)]));
    assert_eq!(report.summary.shards_processed, 1);
}
