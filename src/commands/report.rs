use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::report::{render_report, OutputFormat};
use crate::session::EngineSettings;

use super::util::{load_session, RangeOptions};

pub struct ReportOptions {
    pub engine: EngineSettings,
    pub format: OutputFormat,
    pub range: RangeOptions,
    pub quiet: bool,
}

/// Print the four report tables for a scan CSV.
pub fn run_report(file: &Path, options: &ReportOptions) -> Result<()> {
    let session = load_session(file, options.engine, &options.range, options.quiet)?;
    let report = session.report();
    debug!("Rendering report as {}", options.format.as_str());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_report(&report, options.format, &mut out)?;
    out.flush()?;
    Ok(())
}
