use std::path::Path;

use crate::error::Result;
use crate::filter::DateRange;
use crate::session::{EngineSettings, Session};

/// `--from`/`--to` as given on the command line.
#[derive(Clone, Debug, Default)]
pub struct RangeOptions {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl RangeOptions {
    pub fn resolve(&self) -> Result<Option<DateRange>> {
        DateRange::from_bounds(self.from.as_deref(), self.to.as_deref())
    }
}

/// Load `file` into a session and apply the requested range, if any.
///
/// The range is validated before the file is read so a half-given range
/// fails fast.
pub fn load_session(
    file: &Path,
    settings: EngineSettings,
    range: &RangeOptions,
    quiet: bool,
) -> Result<Session> {
    let range = range.resolve()?;
    let mut session = Session::load(file, settings, !quiet)?;
    if let Some(range) = range {
        session.apply_range(range);
    }
    Ok(session)
}
