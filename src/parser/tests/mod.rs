//! Tests for the shard parser module


use std::io::Write;
use tempfile::NamedTempFile;

pub const HEADER: &str =
    "name,description,salary_from,salary_to,salary_gross,salary_currency,area_name,published_at";

/// Create a temporary shard file with the given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Build a well-formed row in the standard column layout
pub fn vacancy_row(name: &str, from: i64, to: i64, currency: &str, city: &str, date: &str) -> String {
    format!(
        "{},Описание,{},{},False,{},{},{}",
        name, from, to, currency, city, date
    )
}

/// Build shard content from a header and rows
pub fn shard_content(rows: &[String]) -> String {
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    content
}
