//! Derived metrics over a merged aggregate
//!
//! All division happens here, once, after every partial has been merged.

use super::GlobalAggregate;
use crate::constants::{DEFAULT_SHARE_DECIMALS, DEFAULT_SHARE_THRESHOLD, DEFAULT_TOP_N};
use crate::error::{Result, StatsError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Tunables for the city rankings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsOptions {
    /// Minimum rounded share a city needs to be ranked at all
    pub share_threshold: f64,
    /// Decimal places shares are rounded to before the threshold test
    pub share_decimals: u32,
    /// Length of each ranking
    pub top_n: usize,
}

impl Default for MetricsOptions {
    fn default() -> Self {
        Self {
            share_threshold: DEFAULT_SHARE_THRESHOLD,
            share_decimals: DEFAULT_SHARE_DECIMALS,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// The six statistics handed to renderers, plus currency frequencies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Name filter the filtered series were computed with
    pub name_filter: String,

    /// Year to truncated average salary
    pub salary_by_year: BTreeMap<i32, i64>,
    /// Year to record count
    pub count_by_year: BTreeMap<i32, u64>,
    /// Year to truncated average salary of filtered records, 0 where none
    pub filtered_salary_by_year: BTreeMap<i32, i64>,
    /// Year to filtered record count, 0 where none
    pub filtered_count_by_year: BTreeMap<i32, u64>,

    /// Top cities by truncated average salary, among cities passing the share threshold
    pub top_cities_by_salary: Vec<(String, i64)>,
    /// Top cities by rounded share of all records, descending
    pub top_cities_by_share: Vec<(String, f64)>,

    /// Records per currency code, descending
    pub currency_counts: Vec<(String, u64)>,
}

impl DerivedStats {
    /// Derive every statistic from a merged aggregate.
    ///
    /// Fails with [`StatsError::EmptyDataset`] when no record survived parsing.
    pub fn compute(
        global: &GlobalAggregate,
        name_filter: &str,
        options: &MetricsOptions,
    ) -> Result<Self> {
        if global.is_empty() {
            return Err(StatsError::EmptyDataset {
                shards: global.partials(),
            });
        }

        let aggregate = global.aggregate();

        let salary_by_year = aggregate
            .salary_by_year
            .iter()
            .map(|(&year, acc)| (year, acc.truncated_mean()))
            .collect();
        let count_by_year = aggregate.count_by_year.clone();

        // Filtered series share the key set of the unfiltered ones
        let filtered_salary_by_year = aggregate
            .count_by_year
            .keys()
            .map(|year| {
                let mean = aggregate
                    .filtered_salary_by_year
                    .get(year)
                    .map_or(0, |acc| acc.truncated_mean());
                (*year, mean)
            })
            .collect();
        let filtered_count_by_year = aggregate
            .count_by_year
            .keys()
            .map(|year| {
                let count = aggregate
                    .filtered_count_by_year
                    .get(year)
                    .copied()
                    .unwrap_or(0);
                (*year, count)
            })
            .collect();

        let total = aggregate.total_count as f64;
        let mut shares: Vec<(String, f64)> = aggregate
            .count_by_city
            .iter()
            .map(|(city, &count)| {
                (
                    city.clone(),
                    round_to(count as f64 / total, options.share_decimals),
                )
            })
            .filter(|(_, share)| *share >= options.share_threshold)
            .collect();
        sort_descending(&mut shares);

        let mut salaries: Vec<(String, i64)> = shares
            .iter()
            .filter_map(|(city, _)| {
                aggregate
                    .salary_by_city
                    .get(city)
                    .map(|acc| (city.clone(), acc.truncated_mean()))
            })
            .collect();
        // Re-establish key order before ranking so ties break by city name
        salaries.sort_by(|a, b| a.0.cmp(&b.0));
        sort_descending(&mut salaries);

        shares.truncate(options.top_n);
        salaries.truncate(options.top_n);

        let mut currency_counts: Vec<(String, u64)> = aggregate
            .count_by_currency
            .iter()
            .map(|(code, &count)| (code.clone(), count))
            .collect();
        sort_descending(&mut currency_counts);

        debug!(
            "Derived metrics: {} years, {} ranked cities",
            aggregate.count_by_year.len(),
            shares.len()
        );

        Ok(Self {
            name_filter: name_filter.to_string(),
            salary_by_year,
            count_by_year,
            filtered_salary_by_year,
            filtered_count_by_year,
            top_cities_by_salary: salaries,
            top_cities_by_share: shares,
            currency_counts,
        })
    }
}

/// Round half away from zero to `decimals` places.
///
/// Exact binary ties go up, not to the even digit as banker's rounding
/// would: 1/32 at four places is 0.0313, not 0.0312.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Stable sort by value, largest first
fn sort_descending<T: PartialOrd>(entries: &mut [(String, T)]) {
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
}
