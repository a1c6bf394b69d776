use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::report::write_workbook;
use crate::session::EngineSettings;

use super::util::{load_session, RangeOptions};

/// Options for writing the report workbook.
pub struct ExportOptions {
    pub engine: EngineSettings,
    pub output: PathBuf,
    pub range: RangeOptions,
    pub quiet: bool,
}

/// Write the report, processed records and raw rows of a scan CSV to xlsx.
pub fn run_export(file: &Path, options: &ExportOptions) -> Result<PathBuf> {
    let session = load_session(file, options.engine, &options.range, options.quiet)?;
    let report = session.report();

    write_workbook(
        &options.output,
        &report,
        session.records(),
        session.raw_rows(),
    )?;

    if !options.quiet {
        println!("Exported workbook to {}", options.output.display());
    }
    Ok(options.output.clone())
}
