//! Loaded scan data and the currently selected view of it.

use std::path::Path;

use chrono::NaiveDateTime;
use indicatif::ProgressBar;
use serde::Serialize;
use tracing::info;

use crate::aggregate::{
    aggregate_by_category, CategoryField, TemporalAggregator, DEFAULT_TOP_N,
    DEFAULT_WEEKLY_THRESHOLD_DAYS,
};
use crate::error::Result;
use crate::filter::{filter_by_range, DateRange};
use crate::report::{Report, ReportAssembler};
use crate::scans::{normalize_rows, parse_scan_file, RawRow, ScanRecord};
use crate::timezone::{TimeNormalizer, DEFAULT_OFFSET_HOURS};

/// Tunables for the normalize/aggregate pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EngineSettings {
    pub offset_hours: i32,
    pub weekly_threshold_days: i64,
    pub top_cities: usize,
    pub top_countries: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            offset_hours: DEFAULT_OFFSET_HOURS,
            weekly_threshold_days: DEFAULT_WEEKLY_THRESHOLD_DAYS,
            top_cities: DEFAULT_TOP_N,
            top_countries: DEFAULT_TOP_N,
        }
    }
}

impl EngineSettings {
    pub fn normalizer(&self) -> TimeNormalizer {
        TimeNormalizer::new(self.offset_hours)
    }

    pub fn temporal(&self) -> TemporalAggregator {
        TemporalAggregator::new(self.weekly_threshold_days)
    }

    pub fn assembler(&self) -> ReportAssembler {
        ReportAssembler::new(self.top_cities, self.top_countries)
    }
}

/// Records the reports are built from.
#[derive(Clone, Debug)]
enum View {
    All,
    Range {
        range: DateRange,
        records: Vec<ScanRecord>,
    },
}

/// One loaded scan file: raw rows, their normalized records, and the
/// active view. Loading replaces everything; ranges only swap the view.
#[derive(Clone, Debug)]
pub struct Session {
    settings: EngineSettings,
    raw: Vec<RawRow>,
    records: Vec<ScanRecord>,
    view: View,
}

impl Session {
    /// Parse and normalize a scan CSV.
    pub fn load(path: &Path, settings: EngineSettings, show_progress: bool) -> Result<Self> {
        let rows = parse_scan_file(path)?;
        let progress = if show_progress && !rows.is_empty() {
            ProgressBar::new(rows.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        Ok(Self::from_rows(rows, settings, &progress))
    }

    pub fn from_rows(raw: Vec<RawRow>, settings: EngineSettings, progress: &ProgressBar) -> Self {
        let records = normalize_rows(&raw, &settings.normalizer(), progress);
        Self {
            settings,
            raw,
            records,
            view: View::All,
        }
    }

    pub fn raw_rows(&self) -> &[RawRow] {
        &self.raw
    }

    /// Every normalized record, regardless of the active range.
    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    /// Records in the active view.
    pub fn view(&self) -> &[ScanRecord] {
        match &self.view {
            View::All => &self.records,
            View::Range { records, .. } => records,
        }
    }

    pub fn range(&self) -> Option<&DateRange> {
        match &self.view {
            View::All => None,
            View::Range { range, .. } => Some(range),
        }
    }

    /// Restrict the view to `range`. Always filters from the full record set.
    pub fn apply_range(&mut self, range: DateRange) {
        let records = filter_by_range(&self.records, &range);
        self.view = View::Range { range, records };
    }

    pub fn clear_range(&mut self) {
        self.view = View::All;
    }

    pub fn unparsable_count(&self) -> usize {
        self.records.iter().filter(|r| r.timestamp.is_none()).count()
    }

    pub fn unique_visitor_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_unique_visitor).count()
    }

    /// Earliest and latest valid normalized timestamps.
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut stamps = self.records.iter().filter_map(|r| r.timestamp);
        let first = stamps.next()?;
        Some(stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }

    /// Aggregate the active view into the four report tables.
    pub fn report(&self) -> Report {
        let records = self.view();
        let temporal = self.settings.temporal().aggregate(records, self.range());
        let os = aggregate_by_category(records, |r| CategoryField::OperatingSystem.select(r), None);
        let cities = aggregate_by_category(
            records,
            |r| CategoryField::City.select(r),
            Some(self.settings.top_cities),
        );
        let countries = aggregate_by_category(
            records,
            |r| CategoryField::Country.select(r),
            Some(self.settings.top_countries),
        );
        info!("Built report from {} records", records.len());
        self.settings
            .assembler()
            .assemble(&temporal, &os, &cities, &countries)
    }
}
