//! Application constants for vacancy statistics
//!
//! Column names, the built-in currency table and the thresholds used by the
//! derived metrics.

// =============================================================================
// Input Layout
// =============================================================================

/// Default glob pattern for shard files inside the input directory
pub const SHARD_FILE_PATTERN: &str = "*.csv";

/// Byte-order mark some exporters prepend to the header row
pub const UTF8_BOM: char = '\u{feff}';

/// Column names of the fields a record is built from
pub mod columns {
    pub const NAME: &str = "name";
    pub const SALARY_FROM: &str = "salary_from";
    pub const SALARY_TO: &str = "salary_to";
    pub const SALARY_CURRENCY: &str = "salary_currency";
    pub const AREA_NAME: &str = "area_name";
    pub const PUBLISHED_AT: &str = "published_at";
}

/// Characters of `published_at` taken as the year
pub const YEAR_PREFIX_LEN: usize = 4;

/// Characters of `published_at` taken as the year-month rate key (`YYYY-MM`)
pub const MONTH_PREFIX_LEN: usize = 7;

// =============================================================================
// Currency Rates
// =============================================================================

/// Base currency every salary is normalized into
pub const BASE_CURRENCY: &str = "RUR";

/// Fixed multipliers into the base currency
pub const DEFAULT_CURRENCY_RATES: &[(&str, f64)] = &[
    ("AZN", 35.68),
    ("BYR", 23.91),
    ("EUR", 59.90),
    ("GEL", 21.74),
    ("KGS", 0.76),
    ("KZT", 0.13),
    ("RUR", 1.0),
    ("UAH", 1.64),
    ("USD", 60.66),
    ("UZS", 0.0055),
];

/// Fixed-point units per 1.0 of a rate; rates are kept to four decimals
pub const RATE_SCALE: i128 = 10_000;

/// Salary units per rouble: one rate unit times the halving of `from + to`
pub const SALARY_SCALE: i128 = 2 * RATE_SCALE;

/// Largest normalized salary magnitude, in salary units; means must fit `i64`
pub const MAX_SALARY_UNITS: i128 = i64::MAX as i128 * SALARY_SCALE;

/// Name of the date column in a rate-history table
pub const RATE_HISTORY_DATE_COLUMN: &str = "date";

// =============================================================================
// Derived Metrics
// =============================================================================

/// Minimum share of all records a city needs to be ranked
pub const DEFAULT_SHARE_THRESHOLD: f64 = 0.01;

/// Decimal places a city share is rounded to before filtering
pub const DEFAULT_SHARE_DECIMALS: u32 = 4;

/// Length of each city ranking
pub const DEFAULT_TOP_N: usize = 10;

// =============================================================================
// Logging
// =============================================================================

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const VERBOSE_LOG_LEVEL: &str = "debug";
pub const QUIET_LOG_LEVEL: &str = "warn";

/// Row-level error messages kept per shard for diagnostics
pub const MAX_RECORDED_ROW_ERRORS: usize = 50;
