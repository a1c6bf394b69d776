use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, ScanReportError};

pub const COL_DATE_TIME: &str = "Date/time";
pub const COL_COUNTRY_NAME: &str = "Country Name";
pub const COL_COUNTRY_ISO: &str = "Country ISO";
pub const COL_CITY: &str = "City";
pub const COL_DEVICE: &str = "Device";
pub const COL_OPERATING_SYSTEM: &str = "Operating System";
pub const COL_UNIQUE_VISITOR: &str = "Unique Visitor";

/// Column set of the scan log, in export order.
pub const SCAN_COLUMNS: [&str; 7] = [
    COL_DATE_TIME,
    COL_COUNTRY_NAME,
    COL_COUNTRY_ISO,
    COL_CITY,
    COL_DEVICE,
    COL_OPERATING_SYSTEM,
    COL_UNIQUE_VISITOR,
];

/// One CSV row as read from disk: column name to cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawRow {
    values: BTreeMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// Builder form of [`RawRow::insert`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    /// Cell text for `column`; empty cells read as absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Cell text for `column`, or `""`.
    pub fn get_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.values.values().all(|v| v.trim().is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// Read a scan log CSV from disk.
pub fn parse_scan_file(path: &Path) -> Result<Vec<RawRow>> {
    if !path.is_file() {
        return Err(ScanReportError::FileMissing(path.to_path_buf()));
    }
    info!("Selected file: {}", path.display());
    let file = File::open(path)?;
    parse_scan_reader(BufReader::new(file))
}

/// Read a scan log CSV with a header row from any reader.
pub fn parse_scan_reader<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    debug!("CSV columns: {:?}", headers);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.as_str(), record.get(i).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    info!("Parsed {} rows", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::{parse_scan_reader, RawRow, COL_CITY, COL_DATE_TIME, COL_UNIQUE_VISITOR};

    #[test]
    fn parses_rows_keyed_by_header() {
        let csv = "Date/time, City ,Unique Visitor\n\
                   2024-01-01 10:00:00, London ,1\n\
                   2024-01-02 11:00:00,,0\n";
        let rows = parse_scan_reader(csv.as_bytes()).expect("csv should parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(COL_DATE_TIME), Some("2024-01-01 10:00:00"));
        // Values keep their padding for the raw export; headers are trimmed.
        assert_eq!(rows[0].get(COL_CITY), Some(" London "));
        assert_eq!(rows[0].get(COL_UNIQUE_VISITOR), Some("1"));
        assert_eq!(rows[1].get(COL_CITY), None);
    }

    #[test]
    fn short_rows_fill_missing_columns_with_empty() {
        let csv = "Date/time,City,Unique Visitor\n2024-01-01 10:00:00\n";
        let rows = parse_scan_reader(csv.as_bytes()).expect("csv should parse");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(COL_CITY), None);
        assert_eq!(rows[0].get_or_empty(COL_UNIQUE_VISITOR), "");
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let rows = parse_scan_reader("Date/time,City\n".as_bytes()).expect("csv should parse");
        assert!(rows.is_empty());
    }

    #[test]
    fn blank_rows_are_detected() {
        let row = RawRow::new().with(COL_CITY, "  ").with(COL_DATE_TIME, "");
        assert!(row.is_blank());
        assert!(!RawRow::new().with(COL_CITY, "Paris").is_blank());
    }
}
