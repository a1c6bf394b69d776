//! Scan volume over time.
//!
//! Records are counted per calendar day, then laid out either one row per day
//! or in 7-day windows when the covered span is long. Days without scans
//! still get a row (or contribute zero to their window) so the series has no
//! holes.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use crate::filter::DateRange;
use crate::scans::ScanRecord;

/// Spans longer than this many days are bucketed by week.
pub const DEFAULT_WEEKLY_THRESHOLD_DAYS: i64 = 35;

const WEEK_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketMode {
    Daily,
    Weekly,
}

impl BucketMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BucketMode::Daily => "daily",
            BucketMode::Weekly => "weekly",
        }
    }
}

/// A labeled run of days with its scan counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: u64,
    pub unique: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeries {
    pub mode: BucketMode,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub buckets: Vec<Bucket>,
    pub total: u64,
    pub unique: u64,
}

impl TimeSeries {
    fn empty() -> Self {
        Self {
            mode: BucketMode::Daily,
            start: None,
            end: None,
            buckets: Vec::new(),
            total: 0,
            unique: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DayCount {
    total: u64,
    unique: u64,
}

/// Short display label for a day, e.g. `Jan 1 '24`.
pub fn day_label(day: NaiveDate) -> String {
    day.format("%b %-d '%y").to_string()
}

/// Label for a window; a single-day window shows just that day.
pub fn window_label(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        day_label(start)
    } else {
        format!("{} - {}", day_label(start), day_label(end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalAggregator {
    weekly_threshold_days: i64,
}

impl Default for TemporalAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_WEEKLY_THRESHOLD_DAYS)
    }
}

impl TemporalAggregator {
    pub const fn new(weekly_threshold_days: i64) -> Self {
        Self {
            weekly_threshold_days,
        }
    }

    pub fn mode_for_span(&self, day_span: i64) -> BucketMode {
        if day_span > self.weekly_threshold_days {
            BucketMode::Weekly
        } else {
            BucketMode::Daily
        }
    }

    /// Bucket `records` by day or week.
    ///
    /// Without `explicit_range` the series runs from the first to the last
    /// day that has a valid timestamp. With one, it covers exactly the range's
    /// days and ignores records outside them. No valid record in range means
    /// no buckets, only zero totals.
    pub fn aggregate(&self, records: &[ScanRecord], explicit_range: Option<&DateRange>) -> TimeSeries {
        let days = count_by_day(records);

        let bounds = match explicit_range {
            Some(range) => {
                let range = range.clamped();
                Some((range.start_day(), range.end_day()))
            }
            None => days.keys().next().copied().zip(days.keys().next_back().copied()),
        };
        // Gap filling needs at least one valid record inside the bounds.
        let bounds = bounds.filter(|&(start, end)| days.range(start..=end).next().is_some());
        let Some((start, end)) = bounds else {
            debug!("No valid timestamps in range; emitting empty time series");
            return TimeSeries::empty();
        };

        let day_span = (end - start).num_days() + 1;
        let mode = self.mode_for_span(day_span);
        let buckets = match mode {
            BucketMode::Daily => daily_buckets(&days, start, end),
            BucketMode::Weekly => weekly_buckets(&days, start, end),
        };

        let total = buckets.iter().map(|b| b.total).sum();
        let unique = buckets.iter().map(|b| b.unique).sum();
        info!(
            "Generated {} scans table over {} days with total scans: {} and total unique scans: {}",
            mode.as_str(),
            day_span,
            total,
            unique
        );

        TimeSeries {
            mode,
            start: Some(start),
            end: Some(end),
            buckets,
            total,
            unique,
        }
    }
}

fn count_by_day(records: &[ScanRecord]) -> BTreeMap<NaiveDate, DayCount> {
    let mut days: BTreeMap<NaiveDate, DayCount> = BTreeMap::new();
    for record in records {
        let Some(ts) = record.timestamp else {
            continue;
        };
        let day = days.entry(ts.date()).or_default();
        day.total += 1;
        if record.is_unique_visitor {
            day.unique += 1;
        }
    }
    days
}

fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

fn sum_days(days: &BTreeMap<NaiveDate, DayCount>, start: NaiveDate, end: NaiveDate) -> DayCount {
    days.range(start..=end)
        .fold(DayCount::default(), |acc, (_, c)| DayCount {
            total: acc.total + c.total,
            unique: acc.unique + c.unique,
        })
}

fn daily_buckets(days: &BTreeMap<NaiveDate, DayCount>, start: NaiveDate, end: NaiveDate) -> Vec<Bucket> {
    days_between(start, end)
        .map(|day| {
            let count = days.get(&day).copied().unwrap_or_default();
            Bucket {
                label: day_label(day),
                start: day,
                end: day,
                total: count.total,
                unique: count.unique,
            }
        })
        .collect()
}

/// Consecutive 7-day windows anchored at `start`; the last is clipped to `end`.
fn weekly_buckets(days: &BTreeMap<NaiveDate, DayCount>, start: NaiveDate, end: NaiveDate) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut window_start = start;
    while window_start <= end {
        let window_end = window_start
            .checked_add_days(Days::new(WEEK_DAYS - 1))
            .map_or(end, |d| d.min(end));
        let count = sum_days(days, window_start, window_end);
        buckets.push(Bucket {
            label: window_label(window_start, window_end),
            start: window_start,
            end: window_end,
            total: count.total,
            unique: count.unique,
        });
        match window_end.succ_opt() {
            Some(next) => window_start = next,
            None => break,
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::{day_label, window_label, Bucket, BucketMode, TemporalAggregator};
    use crate::filter::DateRange;
    use crate::scans::{RawRow, ScanRecord, COL_DATE_TIME, COL_UNIQUE_VISITOR};
    use crate::timezone::parse_timestamp;

    fn record(ts: &str, unique: bool) -> ScanRecord {
        let row = RawRow::new()
            .with(COL_DATE_TIME, ts)
            .with(COL_UNIQUE_VISITOR, if unique { "1" } else { "0" });
        let base = ScanRecord::from_raw(&row);
        match parse_timestamp(ts) {
            Some(t) => base.with_timestamp(t),
            None => base,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange::from_days(start, end).unwrap()
    }

    #[test]
    fn daily_table_fills_gaps() {
        let records = vec![
            record("2024-01-01 09:00:00", true),
            record("2024-01-01 17:30:00", false),
            record("2024-01-03 08:00:00", false),
        ];
        let series = TemporalAggregator::default().aggregate(&records, None);

        assert_eq!(series.mode, BucketMode::Daily);
        let rows: Vec<(&str, u64, u64)> = series
            .buckets
            .iter()
            .map(|b| (b.label.as_str(), b.total, b.unique))
            .collect();
        assert_eq!(
            rows,
            vec![("Jan 1 '24", 2, 1), ("Jan 2 '24", 0, 0), ("Jan 3 '24", 1, 0)]
        );
        assert_eq!((series.total, series.unique), (3, 1));
    }

    #[test]
    fn unparsable_timestamps_are_skipped() {
        let records = vec![record("2024-01-01 09:00:00", true), record("???", true)];
        let series = TemporalAggregator::default().aggregate(&records, None);
        assert_eq!(series.buckets.len(), 1);
        assert_eq!((series.total, series.unique), (1, 1));
    }

    #[test]
    fn empty_input_yields_zero_totals() {
        let series = TemporalAggregator::default().aggregate(&[], None);
        assert!(series.buckets.is_empty());
        assert_eq!((series.total, series.unique), (0, 0));
        assert_eq!(series.start, None);
    }

    #[test]
    fn explicit_range_without_valid_records_has_empty_body() {
        let r = range(day(2024, 1, 1), day(2024, 1, 3));
        let outside = vec![record("2024-01-10 10:00:00", true), record("???", true)];
        for records in [Vec::new(), outside] {
            let series = TemporalAggregator::default().aggregate(&records, Some(&r));
            assert!(series.buckets.is_empty());
            assert_eq!((series.total, series.unique), (0, 0));
        }
    }

    #[test]
    fn thirty_five_days_is_daily_and_thirty_six_is_weekly() {
        let agg = TemporalAggregator::default();
        let start = day(2024, 1, 1);

        let records = vec![record("2024-01-02 10:00:00", true)];

        let r35 = range(start, start.checked_add_days(Days::new(34)).unwrap());
        let daily = agg.aggregate(&records, Some(&r35));
        assert_eq!(daily.mode, BucketMode::Daily);
        assert_eq!(daily.buckets.len(), 35);

        let r36 = range(start, start.checked_add_days(Days::new(35)).unwrap());
        let weekly = agg.aggregate(&records, Some(&r36));
        assert_eq!(weekly.mode, BucketMode::Weekly);
        assert_eq!(weekly.buckets.len(), 6);
    }

    #[test]
    fn weekly_windows_partition_the_range() {
        let start = day(2024, 1, 3);
        let end = day(2024, 3, 1);
        let records = vec![
            record("2024-01-03 10:00:00", true),
            record("2024-01-09 23:59:59", false),
            record("2024-01-10 00:00:00", true),
            record("2024-03-01 12:00:00", false),
        ];
        let series = TemporalAggregator::default().aggregate(&records, Some(&range(start, end)));
        assert_eq!(series.mode, BucketMode::Weekly);

        let buckets = &series.buckets;
        assert_eq!(buckets.first().unwrap().start, start);
        assert_eq!(buckets.last().unwrap().end, end);
        for pair in buckets.windows(2) {
            assert_eq!(pair[0].end.succ_opt(), Some(pair[1].start));
        }
        let (last, rest) = buckets.split_last().unwrap();
        let days = |b: &Bucket| (b.end - b.start).num_days() + 1;
        assert!(rest.iter().all(|b| days(b) == 7));
        assert!((1..=7).contains(&days(last)));

        assert_eq!((buckets[0].total, buckets[0].unique), (2, 1));
        assert_eq!((buckets[1].total, buckets[1].unique), (1, 1));
        assert_eq!(buckets[0].label, "Jan 3 '24 - Jan 9 '24");
        assert_eq!((series.total, series.unique), (4, 2));
    }

    #[test]
    fn weekly_windows_are_not_weekday_aligned() {
        // 2024-01-03 is a Wednesday; windows still start on it.
        let records = vec![record("2024-01-20 10:00:00", false)];
        let series = TemporalAggregator::default()
            .aggregate(&records, Some(&range(day(2024, 1, 3), day(2024, 2, 14))));
        assert_eq!(series.buckets[1].start, day(2024, 1, 10));
    }

    #[test]
    fn single_day_final_window_has_single_label() {
        // 36 days: five full weeks plus one clipped day.
        let start = day(2024, 1, 1);
        let end = start.checked_add_days(Days::new(35)).unwrap();
        let records = vec![record("2024-02-05 10:00:00", true)];
        let series = TemporalAggregator::default().aggregate(&records, Some(&range(start, end)));
        let last = series.buckets.last().unwrap();
        assert_eq!((last.total, last.unique), (1, 1));
        assert_eq!(last.start, last.end);
        assert_eq!(last.label, day_label(end));
        assert_eq!(last.label, "Feb 5 '24");
    }

    #[test]
    fn derived_range_uses_weekly_for_long_spans() {
        let records = vec![
            record("2024-01-01 10:00:00", true),
            record("2024-03-31 10:00:00", true),
        ];
        let series = TemporalAggregator::default().aggregate(&records, None);
        assert_eq!(series.mode, BucketMode::Weekly);
        assert_eq!(series.start, Some(day(2024, 1, 1)));
        assert_eq!(series.end, Some(day(2024, 3, 31)));
        assert_eq!(series.total, 2);
        assert!(series.buckets.iter().all(|b| b.unique <= b.total));
    }

    #[test]
    fn records_outside_explicit_range_are_ignored() {
        let records = vec![
            record("2023-12-31 23:00:00", true),
            record("2024-01-01 01:00:00", true),
        ];
        let series = TemporalAggregator::default()
            .aggregate(&records, Some(&range(day(2024, 1, 1), day(2024, 1, 2))));
        assert_eq!(series.total, 1);
    }

    #[test]
    fn custom_threshold_switches_earlier() {
        let agg = TemporalAggregator::new(7);
        assert_eq!(agg.mode_for_span(7), BucketMode::Daily);
        assert_eq!(agg.mode_for_span(8), BucketMode::Weekly);
    }

    #[test]
    fn window_labels() {
        assert_eq!(window_label(day(2024, 12, 30), day(2025, 1, 5)), "Dec 30 '24 - Jan 5 '25");
        assert_eq!(window_label(day(2024, 2, 29), day(2024, 2, 29)), "Feb 29 '24");
    }
}
