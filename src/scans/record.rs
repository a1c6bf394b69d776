use chrono::NaiveDateTime;
use indicatif::ProgressBar;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::parser::{
    RawRow, COL_CITY, COL_COUNTRY_ISO, COL_COUNTRY_NAME, COL_DATE_TIME, COL_DEVICE,
    COL_OPERATING_SYSTEM, COL_UNIQUE_VISITOR,
};
use crate::timezone::{format_timestamp, TimeNormalizer};

/// One scan event.
///
/// Records are never edited in place. Normalization produces a new record
/// with a rewritten timestamp; the raw rows stay untouched for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRecord {
    /// Parsed instant, `None` when the source text could not be parsed.
    pub timestamp: Option<NaiveDateTime>,
    /// `YYYY-MM-DD HH:MM:SS` once normalized, otherwise the original text.
    pub date_time: String,
    pub country_name: Option<String>,
    pub country_iso: Option<String>,
    pub city: Option<String>,
    pub device: Option<String>,
    pub operating_system: Option<String>,
    pub unique_visitor: Option<String>,
    pub is_unique_visitor: bool,
}

impl ScanRecord {
    /// Capture a raw row with its cells trimmed; the timestamp is not
    /// interpreted yet.
    pub fn from_raw(row: &RawRow) -> Self {
        let owned = |col: &str| trimmed(row, col).map(str::to_owned);
        Self {
            timestamp: None,
            date_time: trimmed(row, COL_DATE_TIME).unwrap_or("").to_string(),
            country_name: owned(COL_COUNTRY_NAME),
            country_iso: owned(COL_COUNTRY_ISO),
            city: owned(COL_CITY),
            device: owned(COL_DEVICE),
            operating_system: owned(COL_OPERATING_SYSTEM),
            unique_visitor: owned(COL_UNIQUE_VISITOR),
            is_unique_visitor: trimmed(row, COL_UNIQUE_VISITOR) == Some("1"),
        }
    }

    /// Copy of this record carrying a display-zone timestamp.
    pub fn with_timestamp(&self, timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp: Some(timestamp),
            date_time: format_timestamp(timestamp),
            ..self.clone()
        }
    }

    /// Cell values in `SCAN_COLUMNS` order.
    pub fn export_values(&self) -> [&str; 7] {
        [
            self.date_time.as_str(),
            self.country_name.as_deref().unwrap_or(""),
            self.country_iso.as_deref().unwrap_or(""),
            self.city.as_deref().unwrap_or(""),
            self.device.as_deref().unwrap_or(""),
            self.operating_system.as_deref().unwrap_or(""),
            self.unique_visitor.as_deref().unwrap_or(""),
        ]
    }
}

fn trimmed<'a>(row: &'a RawRow, column: &str) -> Option<&'a str> {
    row.get(column).map(str::trim).filter(|v| !v.is_empty())
}

/// Normalize every raw row into a display-zone record.
///
/// Rows whose timestamp cannot be parsed are logged and kept with their
/// original text so they still count in category breakdowns.
pub fn normalize_rows(
    rows: &[RawRow],
    normalizer: &TimeNormalizer,
    progress: &ProgressBar,
) -> Vec<ScanRecord> {
    let mut unparsable = 0usize;
    let records: Vec<ScanRecord> = rows
        .iter()
        .map(|row| {
            let record = ScanRecord::from_raw(row);
            progress.inc(1);
            match normalizer.normalize_timestamp(&record.date_time) {
                Ok(ts) => record.with_timestamp(ts),
                Err(err) => {
                    unparsable += 1;
                    warn!(has_content = !row.is_blank(), "{err}");
                    debug!("Row data: {}", serde_json::to_string(row).unwrap_or_default());
                    record
                }
            }
        })
        .collect();
    progress.finish_and_clear();

    info!(
        "Normalized {} records ({} with unparsable timestamps, offset {}h)",
        records.len(),
        unparsable,
        normalizer.offset_hours()
    );
    records
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressBar;

    use super::{normalize_rows, ScanRecord};
    use crate::scans::parser::{
        RawRow, COL_CITY, COL_DATE_TIME, COL_OPERATING_SYSTEM, COL_UNIQUE_VISITOR, SCAN_COLUMNS,
    };
    use crate::timezone::TimeNormalizer;

    fn row(date: &str, unique: &str) -> RawRow {
        RawRow::new()
            .with(COL_DATE_TIME, date)
            .with(COL_CITY, "Leeds")
            .with(COL_OPERATING_SYSTEM, "iOS")
            .with(COL_UNIQUE_VISITOR, unique)
    }

    #[test]
    fn unique_visitor_requires_literal_one() {
        assert!(ScanRecord::from_raw(&row("2024-01-01 00:00:00", "1")).is_unique_visitor);
        assert!(!ScanRecord::from_raw(&row("2024-01-01 00:00:00", "0")).is_unique_visitor);
        assert!(!ScanRecord::from_raw(&row("2024-01-01 00:00:00", "yes")).is_unique_visitor);
        assert!(!ScanRecord::from_raw(&RawRow::new()).is_unique_visitor);
    }

    #[test]
    fn cells_are_trimmed_on_capture() {
        let raw = RawRow::new()
            .with(COL_DATE_TIME, " 2024-01-01 00:00:00 ")
            .with(COL_CITY, " Leeds ")
            .with(COL_OPERATING_SYSTEM, "   ")
            .with(COL_UNIQUE_VISITOR, " 1");
        let record = ScanRecord::from_raw(&raw);
        assert_eq!(record.date_time, "2024-01-01 00:00:00");
        assert_eq!(record.city.as_deref(), Some("Leeds"));
        assert_eq!(record.operating_system, None);
        assert_eq!(record.unique_visitor.as_deref(), Some("1"));
        assert!(record.is_unique_visitor);
        assert_eq!(raw.get(COL_CITY), Some(" Leeds "));
    }

    #[test]
    fn normalization_rewrites_timestamp_and_keeps_bad_rows() {
        let rows = vec![row("2024-01-02 03:00:00", "1"), row("garbage", "0")];
        let records = normalize_rows(&rows, &TimeNormalizer::new(-5), &ProgressBar::hidden());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date_time, "2024-01-01 22:00:00");
        assert!(records[0].timestamp.is_some());
        assert_eq!(records[1].date_time, "garbage");
        assert!(records[1].timestamp.is_none());
        assert_eq!(records[1].city.as_deref(), Some("Leeds"));

        // Raw rows are untouched.
        assert_eq!(rows[0].get(COL_DATE_TIME), Some("2024-01-02 03:00:00"));
    }

    #[test]
    fn export_values_follow_column_order() {
        let record = ScanRecord::from_raw(&row("2024-01-01 00:00:00", "1"));
        let values = record.export_values();
        assert_eq!(values.len(), SCAN_COLUMNS.len());
        assert_eq!(values[0], "2024-01-01 00:00:00");
        assert_eq!(values[3], "Leeds");
        assert_eq!(values[5], "iOS");
        assert_eq!(values[6], "1");
        assert_eq!(values[1], "");
    }
}
