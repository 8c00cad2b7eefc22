//! Currency rate lookup.
//!
//! Salaries are normalized into the base currency through a [`RateTable`].
//! Two implementations share the contract: [`FixedRates`], a constant
//! code-to-multiplier table, and [`RateHistory`], a per-month table loaded
//! from a CSV file with one column per currency.

use crate::constants::{BASE_CURRENCY, DEFAULT_CURRENCY_RATES, RATE_HISTORY_DATE_COLUMN, UTF8_BOM};
use crate::error::{Result, StatsError};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt::Debug;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Lookup key: currency code plus the `YYYY-MM` month of publication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateKey<'a> {
    pub currency: &'a str,
    pub month: &'a str,
}

impl<'a> RateKey<'a> {
    pub fn new(currency: &'a str, month: &'a str) -> Self {
        Self { currency, month }
    }
}

/// Multiplier into the base currency, or `None` when the key is unknown
pub trait RateTable: Debug + Send + Sync {
    fn rate(&self, key: &RateKey<'_>) -> Option<f64>;
}

/// Constant rates, independent of the publication month
#[derive(Debug, Clone)]
pub struct FixedRates {
    rates: HashMap<String, f64>,
}

impl FixedRates {
    pub fn new<I, S>(rates: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            rates: rates.into_iter().map(|(code, rate)| (code.into(), rate)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for FixedRates {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_RATES.iter().copied())
    }
}

impl RateTable for FixedRates {
    fn rate(&self, key: &RateKey<'_>) -> Option<f64> {
        self.rates.get(key.currency).copied()
    }
}

/// Month-by-month rates loaded from a table shaped like
///
/// ```text
/// date,USD,EUR,KZT
/// 2003-01,31.82,33.71,0.20
/// 2003-02,31.58,33.97,
/// ```
///
/// Blank cells mean no rate for that month. The base currency always has
/// rate 1.
#[derive(Debug, Clone, Default)]
pub struct RateHistory {
    by_month: HashMap<String, HashMap<String, f64>>,
}

impl RateHistory {
    /// Load a rate-history table from disk
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| StatsError::RateTable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let history = Self::from_reader(file, path)?;
        info!(
            "Loaded rate history for {} months from {}",
            history.months(),
            path.display()
        );
        Ok(history)
    }

    /// Parse a rate-history table; `source` is only used in error messages
    pub fn from_reader<R: Read>(reader: R, source: &Path) -> Result<Self> {
        let table_error = |reason: String| StatsError::RateTable {
            path: source.to_path_buf(),
            reason,
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| table_error(format!("failed to read header: {}", e)))?
            .iter()
            .map(|h| h.trim_start_matches(UTF8_BOM).trim().to_string())
            .collect();

        let date_index = headers
            .iter()
            .position(|h| h == RATE_HISTORY_DATE_COLUMN)
            .ok_or_else(|| table_error(format!("missing '{}' column", RATE_HISTORY_DATE_COLUMN)))?;

        let mut by_month = HashMap::new();
        for (line, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|e| table_error(format!("row {}: {}", line + 1, e)))?;

            let raw_date = record.get(date_index).unwrap_or("").trim();
            let month = normalize_month(raw_date)
                .ok_or_else(|| table_error(format!("row {}: bad date '{}'", line + 1, raw_date)))?;

            let mut rates = HashMap::new();
            for (index, code) in headers.iter().enumerate() {
                if index == date_index || code.is_empty() {
                    continue;
                }
                let cell = record.get(index).unwrap_or("").trim();
                if cell.is_empty() {
                    continue;
                }
                let rate = cell.replace(',', ".").parse::<f64>().map_err(|_| {
                    table_error(format!("row {}: bad rate '{}' for {}", line + 1, cell, code))
                })?;
                rates.insert(code.clone(), rate);
            }

            debug!("Rate history {}: {} currencies", month, rates.len());
            by_month.insert(month, rates);
        }

        Ok(Self { by_month })
    }

    pub fn months(&self) -> usize {
        self.by_month.len()
    }
}

impl RateTable for RateHistory {
    fn rate(&self, key: &RateKey<'_>) -> Option<f64> {
        if key.currency == BASE_CURRENCY {
            return Some(1.0);
        }
        self.by_month.get(key.month)?.get(key.currency).copied()
    }
}

/// Reduce `YYYY-MM` or `YYYY-MM-DD` to the `YYYY-MM` lookup key
fn normalize_month(raw: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%Y-%m").to_string())
}
