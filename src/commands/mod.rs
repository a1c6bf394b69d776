mod convert;
mod export;
mod report;
mod stats;
mod util;

pub use convert::{convert_timestamp, run_convert, ConvertOptions};
pub use export::{run_export, ExportOptions};
pub use report::{run_report, ReportOptions};
pub use stats::{run_stats, StatsOptions, StatsOutput};
pub use util::{load_session, RangeOptions};
