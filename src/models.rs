//! Core data structures for vacancy processing.
//!
//! Defines the closed set of input columns a record is built from and the
//! typed [`Record`] produced for every accepted row.

use crate::constants::{
    MAX_SALARY_UNITS, MONTH_PREFIX_LEN, RATE_SCALE, SALARY_SCALE, YEAR_PREFIX_LEN, columns,
};
use crate::error::RowError;
use crate::rates::{RateKey, RateTable};
use serde::{Deserialize, Serialize};

/// Input columns required to build a [`Record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordField {
    Name,
    SalaryFrom,
    SalaryTo,
    SalaryCurrency,
    AreaName,
    PublishedAt,
}

impl RecordField {
    pub const ALL: [RecordField; 6] = [
        RecordField::Name,
        RecordField::SalaryFrom,
        RecordField::SalaryTo,
        RecordField::SalaryCurrency,
        RecordField::AreaName,
        RecordField::PublishedAt,
    ];

    /// Header name of the column holding this field
    pub fn column_name(&self) -> &'static str {
        match self {
            RecordField::Name => columns::NAME,
            RecordField::SalaryFrom => columns::SALARY_FROM,
            RecordField::SalaryTo => columns::SALARY_TO,
            RecordField::SalaryCurrency => columns::SALARY_CURRENCY,
            RecordField::AreaName => columns::AREA_NAME,
            RecordField::PublishedAt => columns::PUBLISHED_AT,
        }
    }

    /// Index into [`RecordField::ALL`]
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

/// One accepted job posting with its salary normalized into the base currency
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub salary_from: i64,
    pub salary_to: i64,
    pub currency: String,
    /// `rate * (salary_from + salary_to) / 2`, exact, in `1 / SALARY_SCALE` roubles
    pub salary_units: i128,
    /// Same salary in roubles, for display
    pub salary: f64,
    pub city: String,
    pub year: i32,
}

impl Record {
    /// Build a record, looking up the currency multiplier in `rates`.
    ///
    /// The year is the first four characters of `published_at`; no calendar
    /// parsing is attempted.
    pub fn new(
        name: String,
        salary_from: i64,
        salary_to: i64,
        currency: String,
        city: String,
        published_at: &str,
        rates: &dyn RateTable,
    ) -> Result<Self, RowError> {
        let year = published_at
            .get(..YEAR_PREFIX_LEN)
            .and_then(|prefix| prefix.parse::<i32>().ok())
            .ok_or_else(|| RowError::InvalidValue {
                field: RecordField::PublishedAt.column_name(),
                value: published_at.to_string(),
            })?;

        let month = published_at.get(..MONTH_PREFIX_LEN).unwrap_or(published_at);
        let rate = rates
            .rate(&RateKey::new(&currency, month))
            .ok_or_else(|| RowError::UnknownCurrency {
                currency: currency.clone(),
            })?;

        let salary_units = normalized_salary_units(rate, salary_from, salary_to).ok_or_else(|| {
            RowError::InvalidValue {
                field: "salary",
                value: format!("{}..{} {}", salary_from, salary_to, currency),
            }
        })?;

        Ok(Self {
            name,
            salary_from,
            salary_to,
            currency,
            salary_units,
            salary: salary_units as f64 / SALARY_SCALE as f64,
            city,
            year,
        })
    }

    /// Case-sensitive substring match; an empty filter matches every record
    pub fn matches_name(&self, filter: &str) -> bool {
        self.name.contains(filter)
    }
}

/// `rate * (from + to) / 2` in salary units, with the rate rounded to
/// four decimals. `None` when the result is out of range.
fn normalized_salary_units(rate: f64, salary_from: i64, salary_to: i64) -> Option<i128> {
    let rate_units = (rate * RATE_SCALE as f64).round();
    if !rate_units.is_finite() || rate_units.abs() >= i64::MAX as f64 {
        return None;
    }
    let units = (rate_units as i128).checked_mul(i128::from(salary_from) + i128::from(salary_to))?;
    (units.abs() <= MAX_SALARY_UNITS).then_some(units)
}
