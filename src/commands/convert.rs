use crate::error::{Result, ScanReportError};
use crate::timezone::TimeNormalizer;

pub struct ConvertOptions {
    pub offset_hours: i32,
    /// Display zone back to source zone.
    pub reverse: bool,
}

/// Convert one timestamp between the source and display timezones.
pub fn convert_timestamp(timestamp: &str, options: &ConvertOptions) -> Result<String> {
    let normalizer = TimeNormalizer::new(options.offset_hours);
    let converted = if options.reverse {
        normalizer.denormalize(timestamp)
    } else {
        normalizer.normalize(timestamp)
    };
    converted.map_err(|err| ScanReportError::InvalidArgs(err.to_string()))
}

pub fn run_convert(timestamp: &str, options: &ConvertOptions) -> Result<()> {
    println!("{}", convert_timestamp(timestamp, options)?);
    Ok(())
}
