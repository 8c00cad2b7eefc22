//! Per-shard and global aggregates
//!
//! A [`PartialAggregate`] is built by exactly one worker from exactly one
//! shard and handed over by value once the shard is exhausted. The
//! [`GlobalAggregate`] is the merge of all partials of a run.

use super::{Merge, SalaryAccumulator};
use crate::models::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accumulated statistics for one shard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialAggregate {
    pub salary_by_year: BTreeMap<i32, SalaryAccumulator>,
    pub count_by_year: BTreeMap<i32, u64>,

    /// Same as the year maps, restricted to records matching the name filter
    pub filtered_salary_by_year: BTreeMap<i32, SalaryAccumulator>,
    pub filtered_count_by_year: BTreeMap<i32, u64>,

    pub salary_by_city: BTreeMap<String, SalaryAccumulator>,
    pub count_by_city: BTreeMap<String, u64>,

    pub count_by_currency: BTreeMap<String, u64>,

    pub total_count: u64,
}

impl PartialAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record in
    pub fn write(&mut self, record: &Record, name_filter: &str) {
        self.salary_by_year
            .entry(record.year)
            .or_default()
            .add(record.salary_units);
        *self.count_by_year.entry(record.year).or_default() += 1;

        if record.matches_name(name_filter) {
            self.filtered_salary_by_year
                .entry(record.year)
                .or_default()
                .add(record.salary_units);
            *self.filtered_count_by_year.entry(record.year).or_default() += 1;
        }

        self.salary_by_city
            .entry(record.city.clone())
            .or_default()
            .add(record.salary_units);
        *self.count_by_city.entry(record.city.clone()).or_default() += 1;

        *self
            .count_by_currency
            .entry(record.currency.clone())
            .or_default() += 1;

        self.total_count += 1;
    }

    /// Fold a whole sequence of records
    pub fn fold<'r, I>(records: I, name_filter: &str) -> Self
    where
        I: IntoIterator<Item = &'r Record>,
    {
        let mut aggregate = Self::new();
        for record in records {
            aggregate.write(record, name_filter);
        }
        aggregate
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

impl Merge for PartialAggregate {
    fn merge(&mut self, other: Self) {
        self.salary_by_year.merge(other.salary_by_year);
        self.count_by_year.merge(other.count_by_year);
        self.filtered_salary_by_year
            .merge(other.filtered_salary_by_year);
        self.filtered_count_by_year
            .merge(other.filtered_count_by_year);
        self.salary_by_city.merge(other.salary_by_city);
        self.count_by_city.merge(other.count_by_city);
        self.count_by_currency.merge(other.count_by_currency);
        self.total_count += other.total_count;
    }
}

/// Merge of every partial aggregate in a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalAggregate {
    aggregate: PartialAggregate,
    partials: usize,
}

impl GlobalAggregate {
    /// Reduce a batch of partials; order does not affect the result
    pub fn merge_all<I>(partials: I) -> Self
    where
        I: IntoIterator<Item = PartialAggregate>,
    {
        partials
            .into_iter()
            .fold(Self::default(), |mut global, partial| {
                global.aggregate.merge(partial);
                global.partials += 1;
                global
            })
    }

    pub fn aggregate(&self) -> &PartialAggregate {
        &self.aggregate
    }

    /// Number of partials merged in
    pub fn partials(&self) -> usize {
        self.partials
    }

    pub fn total_count(&self) -> u64 {
        self.aggregate.total_count
    }

    pub fn is_empty(&self) -> bool {
        self.aggregate.is_empty()
    }
}

impl From<PartialAggregate> for GlobalAggregate {
    fn from(aggregate: PartialAggregate) -> Self {
        Self {
            aggregate,
            partials: 1,
        }
    }
}
