//! Header analysis for shard files
//!
//! Resolves every [`RecordField`] to its column index once per shard so the
//! row loop never looks columns up by name.

use crate::constants::UTF8_BOM;
use crate::error::{Result, StatsError};
use crate::models::RecordField;
use csv::StringRecord;
use std::collections::HashMap;
use std::path::Path;

/// Column layout of one shard
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Number of columns in the header; rows must match it exactly
    pub header_len: usize,

    field_indices: [usize; RecordField::ALL.len()],
}

impl ColumnMapping {
    /// Analyze a header row, failing if any required column is missing
    pub fn analyze(headers: &StringRecord, path: &Path) -> Result<Self> {
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(StatsError::unreadable(path, "missing header row"));
        }

        let name_to_index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (normalize_header(header), index))
            .collect();

        let mut field_indices = [0usize; RecordField::ALL.len()];
        let mut missing = Vec::new();
        for field in RecordField::ALL {
            match name_to_index.get(field.column_name()) {
                Some(&index) => field_indices[field.ordinal()] = index,
                None => missing.push(field.column_name()),
            }
        }

        if !missing.is_empty() {
            return Err(StatsError::unreadable(
                path,
                format!("header lacks required columns: {}", missing.join(", ")),
            ));
        }

        Ok(Self {
            header_len: headers.len(),
            field_indices,
        })
    }

    /// Column index of a required field
    pub fn index(&self, field: RecordField) -> usize {
        self.field_indices[field.ordinal()]
    }
}

/// Strip a leading byte-order mark and surrounding whitespace from a header cell
pub fn normalize_header(header: &str) -> String {
    header.trim_start_matches(UTF8_BOM).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_analyze_resolves_fields() {
        let headers = header(&[
            "name",
            "key_skills",
            "salary_from",
            "salary_to",
            "salary_currency",
            "area_name",
            "published_at",
        ]);
        let mapping = ColumnMapping::analyze(&headers, Path::new("a.csv")).unwrap();

        assert_eq!(mapping.header_len, 7);
        assert_eq!(mapping.index(RecordField::Name), 0);
        assert_eq!(mapping.index(RecordField::SalaryFrom), 2);
        assert_eq!(mapping.index(RecordField::PublishedAt), 6);
        assert_eq!(mapping.index(RecordField::AreaName), 5);
    }

    #[test]
    fn test_analyze_strips_bom() {
        let headers = header(&[
            "\u{feff}name",
            "salary_from",
            "salary_to",
            "salary_currency",
            "area_name",
            "published_at",
        ]);
        let mapping = ColumnMapping::analyze(&headers, Path::new("a.csv")).unwrap();
        assert_eq!(mapping.index(RecordField::Name), 0);
    }

    #[test]
    fn test_analyze_missing_column() {
        let headers = header(&["name", "salary_from", "salary_to", "area_name"]);
        let err = ColumnMapping::analyze(&headers, Path::new("a.csv")).unwrap_err();
        match err {
            StatsError::PartitionUnreadable { reason, .. } => {
                assert!(reason.contains("salary_currency"));
                assert!(reason.contains("published_at"));
            }
            other => panic!("Expected PartitionUnreadable, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_empty_header() {
        let err = ColumnMapping::analyze(&StringRecord::new(), Path::new("a.csv")).unwrap_err();
        assert!(matches!(err, StatsError::PartitionUnreadable { .. }));
    }
}
