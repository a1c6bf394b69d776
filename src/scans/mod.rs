mod parser;
mod record;

pub use parser::{
    parse_scan_file, parse_scan_reader, RawRow, COL_CITY, COL_COUNTRY_ISO, COL_COUNTRY_NAME,
    COL_DATE_TIME, COL_DEVICE, COL_OPERATING_SYSTEM, COL_UNIQUE_VISITOR, SCAN_COLUMNS,
};
pub use record::{normalize_rows, ScanRecord};
