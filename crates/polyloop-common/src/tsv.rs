//! Tab-separated curation table reading.
//!
//! Column sets are checked against the header before any row is deserialised,
//! so a table missing a contract column fails with `MissingColumn` instead of a
//! per-row serde error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::{PolyloopError, Result};

/// Cell values that the curation exports use for "no value".
const NULL_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "None", "null"];

/// Column contract for one table. Each inner slice lists accepted aliases
/// for a single required column.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [&'static [&'static str]],
}

impl TableSpec {
    /// Returns the first required column absent from `headers`.
    pub fn missing_column(&self, headers: &csv::StringRecord) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|aliases| !aliases.iter().any(|a| headers.iter().any(|h| h.trim() == *a)))
            .map(|aliases| aliases[0])
    }
}

/// Read every row of a TSV table into `T`.
pub fn read_table<T, R>(reader: R, spec: &TableSpec) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if let Some(column) = spec.missing_column(&headers) {
        return Err(PolyloopError::MissingColumn {
            table: spec.name.to_string(),
            column: column.to_string(),
        });
    }

    let mut rows = Vec::new();
    for record in rdr.deserialize() {
        rows.push(record?);
    }
    debug!(table = spec.name, rows = rows.len(), "Loaded table");
    Ok(rows)
}

pub fn read_table_file<T>(path: impl AsRef<Path>, spec: &TableSpec) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let file = std::fs::File::open(path.as_ref())?;
    read_table(file, spec)
}

/// Trim a cell and map blank / null-token cells to `None`.
pub fn clean(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() || NULL_TOKENS.contains(&trimmed) {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

/// serde helper for optional cells: `#[serde(default, deserialize_with = "nullable")]`.
pub fn nullable<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(clean(raw))
}

/// Parse a year cell that may have been written as a float (`2019.0`).
pub fn parse_year(value: &str) -> Option<i32> {
    let value = value.trim();
    value
        .parse::<i32>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().filter(|y| y.fract() == 0.0).map(|y| y as i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        group: String,
        #[serde(default, deserialize_with = "nullable")]
        #[serde(alias = "type")]
        method: Option<String>,
    }

    const SPEC: TableSpec = TableSpec {
        name: "conditions",
        columns: &[&["group"], &["method", "type"]],
    };

    #[test]
    fn test_reads_rows_with_alias_and_nulls() {
        let data = "group\ttype\n7\thydrolysis\n8\tNaN\n9\t\n";
        let rows: Vec<Row> = read_table(data.as_bytes(), &SPEC).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].method.as_deref(), Some("hydrolysis"));
        assert_eq!(rows[1].method, None);
        assert_eq!(rows[2].method, None);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let data = "group\tcatalyst\n7\tx\n";
        let err = read_table::<Row, _>(data.as_bytes(), &SPEC).unwrap_err();
        match err {
            PolyloopError::MissingColumn { table, column } => {
                assert_eq!(table, "conditions");
                assert_eq!(column, "method");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_clean_trims() {
        assert_eq!(clean(Some("  PET ".into())), Some("PET".to_string()));
        assert_eq!(clean(Some("   ".into())), None);
        assert_eq!(clean(None), None);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2019"), Some(2019));
        assert_eq!(parse_year("2019.0"), Some(2019));
        assert_eq!(parse_year("2019.5"), None);
        assert_eq!(parse_year("soon"), None);
    }
}
