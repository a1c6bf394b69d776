//! Convenience prelude for common scan report embedding tasks.

pub use crate::api::{
    parse_scan_file, render_report, write_workbook, DateRange, EngineSettings, OutputFormat,
    Report, Result, ScanReportError, Session, TimeNormalizer,
};
