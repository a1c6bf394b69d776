use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::session::{EngineSettings, Session};
use crate::timezone::format_timestamp;

#[derive(Clone, Copy, Debug, Default)]
pub struct StatsOptions {
    pub engine: EngineSettings,
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct StatsOutput {
    pub rows: usize,
    pub valid_timestamps: usize,
    pub unparsable_timestamps: usize,
    pub unique_visitors: usize,
    pub date_min: Option<String>,
    pub date_max: Option<String>,
}

impl StatsOutput {
    pub fn from_session(session: &Session) -> Self {
        let rows = session.records().len();
        let unparsable = session.unparsable_count();
        let bounds = session.bounds();
        Self {
            rows,
            valid_timestamps: rows - unparsable,
            unparsable_timestamps: unparsable,
            unique_visitors: session.unique_visitor_count(),
            date_min: bounds.map(|(lo, _)| format_timestamp(lo)),
            date_max: bounds.map(|(_, hi)| format_timestamp(hi)),
        }
    }
}

/// Show script-friendly stats for a scan CSV.
pub fn run_stats(file: &Path, options: &StatsOptions) -> Result<()> {
    let session = Session::load(file, options.engine, false)?;
    let out = StatsOutput::from_session(&session);

    if options.json {
        println!("{}", serde_json::to_string(&out)?);
        return Ok(());
    }

    println!("rows={}", out.rows);
    println!("valid_timestamps={}", out.valid_timestamps);
    println!("unparsable_timestamps={}", out.unparsable_timestamps);
    println!("unique_visitors={}", out.unique_visitors);
    println!("date_min={}", out.date_min.as_deref().unwrap_or(""));
    println!("date_max={}", out.date_max.as_deref().unwrap_or(""));

    Ok(())
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressBar;

    use super::StatsOutput;
    use crate::scans::{RawRow, COL_DATE_TIME, COL_UNIQUE_VISITOR};
    use crate::session::{EngineSettings, Session};

    #[test]
    fn counts_valid_and_unparsable_rows() {
        let rows = vec![
            RawRow::new()
                .with(COL_DATE_TIME, "2024-01-02 04:00:00")
                .with(COL_UNIQUE_VISITOR, "1"),
            RawRow::new().with(COL_DATE_TIME, "2024-01-09 12:30:00"),
            RawRow::new().with(COL_DATE_TIME, "not a date"),
        ];
        let session = Session::from_rows(rows, EngineSettings::default(), &ProgressBar::hidden());
        let out = StatsOutput::from_session(&session);
        assert_eq!(out.rows, 3);
        assert_eq!(out.valid_timestamps, 2);
        assert_eq!(out.unparsable_timestamps, 1);
        assert_eq!(out.unique_visitors, 1);
        assert_eq!(out.date_min.as_deref(), Some("2024-01-01 23:00:00"));
        assert_eq!(out.date_max.as_deref(), Some("2024-01-09 07:30:00"));
    }
}
