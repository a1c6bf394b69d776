//! Stable, supported API surface for embedding the scan report engine.
//!
//! This module re-exports the types and functions intended for external use.
//! Treat the contents of this module as SemVer-stable.

pub use crate::aggregate::{
    aggregate_by_category, percentage, Bucket, BucketMode, CategoryCount, CategoryField,
    TemporalAggregator, TimeSeries, DEFAULT_TOP_N, DEFAULT_WEEKLY_THRESHOLD_DAYS,
    UNKNOWN_CATEGORY,
};
pub use crate::commands::{
    convert_timestamp, run_convert, run_export, run_report, run_stats, ConvertOptions,
    ExportOptions, RangeOptions, ReportOptions, StatsOptions, StatsOutput,
};
pub use crate::error::{Result, ScanReportError};
pub use crate::filter::{filter_by_range, DateRange};
pub use crate::report::{
    render_report, sheet_rows, write_workbook, Cell, OutputFormat, Report, ReportAssembler,
    ReportTable, RowKind, SheetRow,
};
pub use crate::scans::{
    normalize_rows, parse_scan_file, parse_scan_reader, RawRow, ScanRecord, SCAN_COLUMNS,
};
pub use crate::session::{EngineSettings, Session};
pub use crate::timezone::{parse_timestamp, TimeNormalizer, UnparsableTimestamp};
