use std::path::PathBuf;

use thiserror::Error;

/// Errors that can stop a scanreport command.
///
/// Per-record problems (such as an unparsable timestamp) never surface here;
/// they are logged and the record is kept.
#[derive(Error, Debug)]
pub enum ScanReportError {
    /// IO error (permission denied, disk full, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader rejected the input file.
    #[error("Error parsing CSV file: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Workbook writer error.
    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// No input file at the given path.
    #[error("Please select a CSV file to upload (not found: {})", .0.display())]
    FileMissing(PathBuf),

    /// Only one end of a date range was supplied.
    #[error("Please select both start and end dates")]
    IncompleteRangeSelection,

    /// Invalid command line or configuration value.
    #[error("{0}")]
    InvalidArgs(String),
}

/// Convenience result type for scanreport operations.
pub type Result<T> = std::result::Result<T, ScanReportError>;
