//! Individual row parsing for shard files
//!
//! A row is accepted only when its field count equals the header's and none
//! of its fields is empty. Accepted rows become [`Record`]s; everything else
//! is reported as a [`RowError`] for the caller to count.

use csv::StringRecord;

use super::column_mapping::ColumnMapping;
use crate::error::RowError;
use crate::models::{Record, RecordField};
use crate::rates::RateTable;

/// Check the shape of a row against the header
pub fn validate_row(row: &StringRecord, header_len: usize) -> Result<(), RowError> {
    if row.len() != header_len {
        return Err(RowError::Malformed {
            expected: header_len,
            found: row.len(),
        });
    }

    if let Some(column) = row.iter().position(|field| field.is_empty()) {
        return Err(RowError::EmptyField { column });
    }

    Ok(())
}

/// Parse a single row into a record
pub fn parse_record(
    row: &StringRecord,
    mapping: &ColumnMapping,
    rates: &dyn RateTable,
) -> Result<Record, RowError> {
    validate_row(row, mapping.header_len)?;

    let field = |f: RecordField| row.get(mapping.index(f)).unwrap_or("");

    let salary_from = parse_salary(field(RecordField::SalaryFrom), RecordField::SalaryFrom)?;
    let salary_to = parse_salary(field(RecordField::SalaryTo), RecordField::SalaryTo)?;

    Record::new(
        field(RecordField::Name).to_string(),
        salary_from,
        salary_to,
        field(RecordField::SalaryCurrency).to_string(),
        field(RecordField::AreaName).to_string(),
        field(RecordField::PublishedAt),
        rates,
    )
}

/// Parse a salary bound, truncating decimal text toward zero (`"100.7"` -> 100)
pub fn parse_salary(value: &str, field: RecordField) -> Result<i64, RowError> {
    let invalid = || RowError::InvalidValue {
        field: field.column_name(),
        value: value.to_string(),
    };

    let parsed = value.trim().parse::<f64>().map_err(|_| invalid())?.trunc();
    // i64::MAX is not representable as f64; 2^63 is the first value out of range
    if !parsed.is_finite() || parsed < i64::MIN as f64 || parsed >= i64::MAX as f64 {
        return Err(invalid());
    }
    Ok(parsed as i64)
}
