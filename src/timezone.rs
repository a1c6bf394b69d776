//! Fixed-offset conversion between the source and display timezones.
//!
//! Scan logs are stamped in the source zone (UK time, treated as UTC). Reports
//! are shown in the display zone, a fixed number of hours away. There is no DST
//! handling: the offset is a single signed hour count.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

/// Shift applied to source timestamps to reach the display zone (UK -> ET).
pub const DEFAULT_OFFSET_HOURS: i32 = -5;

/// Layout of every normalized timestamp string.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// A timestamp string that none of the accepted layouts could parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid date encountered: {raw}")]
pub struct UnparsableTimestamp {
    pub raw: String,
}

impl UnparsableTimestamp {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
        }
    }
}

/// Parse a naive timestamp in any of the accepted layouts, truncated to whole
/// seconds. Strings carrying an explicit offset are converted to UTC.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(whole_seconds(dt.naive_utc()));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(whole_seconds(dt));
        }
    }

    parse_date(s).map(|date| date.and_time(NaiveTime::MIN))
}

/// Parse a bare calendar date in any of the accepted date-only layouts.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn whole_seconds(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Format a timestamp the way normalized records carry it.
pub fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}

/// Converts timestamps between the source and display zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeNormalizer {
    offset_hours: i32,
}

impl Default for TimeNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_OFFSET_HOURS)
    }
}

impl TimeNormalizer {
    pub const fn new(offset_hours: i32) -> Self {
        Self { offset_hours }
    }

    pub fn offset_hours(&self) -> i32 {
        self.offset_hours
    }

    /// Source-zone instant to display-zone instant.
    pub fn to_display(&self, source: NaiveDateTime) -> Option<NaiveDateTime> {
        source.checked_add_signed(Duration::hours(i64::from(self.offset_hours)))
    }

    /// Display-zone instant back to the source zone.
    pub fn to_source(&self, display: NaiveDateTime) -> Option<NaiveDateTime> {
        display.checked_sub_signed(Duration::hours(i64::from(self.offset_hours)))
    }

    /// Parse a source-zone string and return the display-zone instant.
    pub fn normalize_timestamp(&self, raw: &str) -> Result<NaiveDateTime, UnparsableTimestamp> {
        parse_timestamp(raw)
            .and_then(|dt| self.to_display(dt))
            .ok_or_else(|| UnparsableTimestamp::new(raw))
    }

    /// Rewrite a source-zone string as a display-zone `YYYY-MM-DD HH:MM:SS`.
    ///
    /// On failure the caller keeps the original string; the error carries it.
    pub fn normalize(&self, raw: &str) -> Result<String, UnparsableTimestamp> {
        self.normalize_timestamp(raw).map(format_timestamp)
    }

    /// Inverse of [`TimeNormalizer::normalize`].
    pub fn denormalize(&self, display: &str) -> Result<String, UnparsableTimestamp> {
        parse_timestamp(display)
            .and_then(|dt| self.to_source(dt))
            .map(format_timestamp)
            .ok_or_else(|| UnparsableTimestamp::new(display))
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_date, parse_timestamp, TimeNormalizer, UnparsableTimestamp};
    use chrono::NaiveDate;

    #[test]
    fn normalize_shifts_uk_to_eastern() {
        let tz = TimeNormalizer::default();
        assert_eq!(
            tz.normalize("2024-01-15 10:30:00").unwrap(),
            "2024-01-15 05:30:00"
        );
    }

    #[test]
    fn normalize_crosses_midnight_backwards() {
        let tz = TimeNormalizer::new(-5);
        assert_eq!(
            tz.normalize("2024-03-01 02:00:00").unwrap(),
            "2024-02-29 21:00:00"
        );
    }

    #[test]
    fn normalize_keeps_original_on_failure() {
        let tz = TimeNormalizer::default();
        let err = tz.normalize("not a date").unwrap_err();
        assert_eq!(
            err,
            UnparsableTimestamp {
                raw: "not a date".to_string()
            }
        );
    }

    #[test]
    fn round_trips_through_inverse() {
        let tz = TimeNormalizer::new(-5);
        for t in [
            "2024-01-01 00:00:00",
            "2024-02-29 23:59:59",
            "2023-12-31 04:59:59",
            "2024-07-04 12:00:00",
        ] {
            let display = tz.normalize(t).unwrap();
            assert_eq!(tz.denormalize(&display).unwrap(), t);
        }

        let east = TimeNormalizer::new(9);
        let display = east.normalize("2024-12-31 20:15:07").unwrap();
        assert_eq!(display, "2025-01-01 05:15:07");
        assert_eq!(east.denormalize(&display).unwrap(), "2024-12-31 20:15:07");
    }

    #[test]
    fn parses_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        for s in [
            "2024-01-15 10:30:00",
            "2024-01-15T10:30:00",
            "2024-01-15T10:30:00.250",
            "2024-01-15T10:30:00Z",
            "2024-01-15T11:30:00+01:00",
            "2024-01-15 10:30",
            "01/15/2024 10:30:00",
            " 2024/01/15 10:30:00 ",
        ] {
            assert_eq!(parse_timestamp(s), Some(expected), "layout {s}");
        }

        let midnight = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-01-15"), Some(midnight));
        assert_eq!(parse_timestamp("1/15/2024"), Some(midnight));
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
    }

    #[test]
    fn parses_date_only_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 3);
        for s in ["2024-01-03", "2024/01/03", "01/03/2024", "1/3/2024"] {
            assert_eq!(parse_date(s), expected, "layout {s}");
        }
        assert_eq!(parse_date("2024-01-03 10:00:00"), None);
    }
}
