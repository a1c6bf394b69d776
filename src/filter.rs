use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::info;

use crate::error::{Result, ScanReportError};
use crate::scans::ScanRecord;
use crate::timezone::{parse_date, parse_timestamp};

/// An inclusive `[start, end]` window in the display timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(ScanReportError::InvalidArgs(format!(
                "Start of range ({start}) is after its end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Whole days from `start` 00:00:00.000 to `end` 23:59:59.999.
    pub fn from_days(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Self::new(start_of_day(start), end_of_day(end))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn start_day(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_day(&self) -> NaiveDate {
        self.end.date()
    }

    /// The same range widened to full-day boundaries.
    pub fn clamped(&self) -> Self {
        Self {
            start: start_of_day(self.start_day()),
            end: end_of_day(self.end_day()),
        }
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }

    /// Build a range from optional `--from`/`--to` values.
    ///
    /// Neither given means no range; exactly one given is an incomplete
    /// selection.
    pub fn from_bounds(from: Option<&str>, to: Option<&str>) -> Result<Option<Self>> {
        match (from, to) {
            (None, None) => Ok(None),
            (Some(from), Some(to)) => {
                let start = parse_bound(from, false)?;
                let end = parse_bound(to, true)?;
                Self::new(start, end).map(Some)
            }
            _ => Err(ScanReportError::IncompleteRangeSelection),
        }
    }
}

pub fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

pub fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    // 23:59:59.999 is always a valid time of day.
    day.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| day.and_time(NaiveTime::MIN))
}

fn parse_bound(s: &str, is_end: bool) -> Result<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ScanReportError::IncompleteRangeSelection);
    }

    if let Some(date) = parse_date(s) {
        return Ok(if is_end {
            end_of_day(date)
        } else {
            start_of_day(date)
        });
    }

    parse_timestamp(s).ok_or_else(|| {
        ScanReportError::InvalidArgs(format!(
            "Invalid range bound '{s}'; expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS"
        ))
    })
}

/// Records whose normalized timestamp lies inside `range`.
///
/// Records without a parsable timestamp cannot be placed and are dropped.
pub fn filter_by_range(records: &[ScanRecord], range: &DateRange) -> Vec<ScanRecord> {
    let filtered: Vec<ScanRecord> = records
        .iter()
        .filter(|r| r.timestamp.is_some_and(|t| range.contains(t)))
        .cloned()
        .collect();
    info!(
        "Filtered {} of {} records to {} .. {}",
        filtered.len(),
        records.len(),
        range.start(),
        range.end()
    );
    filtered
}
