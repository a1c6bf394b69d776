use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::info;

use super::{sheet_rows, Cell, CellStyle, Report};
use crate::error::Result;
use crate::scans::{RawRow, ScanRecord, SCAN_COLUMNS};

pub const REPORT_SHEET: &str = "QR Code Scans Data";
pub const PROCESSED_SHEET: &str = "Processed Data";
pub const RAW_SHEET: &str = "Raw Data";

/// Write the three-sheet workbook: styled report, normalized records, raw rows.
pub fn write_workbook(
    path: &Path,
    report: &Report,
    processed: &[ScanRecord],
    raw: &[RawRow],
) -> Result<()> {
    let mut workbook = Workbook::new();
    workbook.push_worksheet(report_sheet(report)?);
    workbook.push_worksheet(records_sheet(
        PROCESSED_SHEET,
        processed.iter().map(|r| r.export_values()),
    )?);
    workbook.push_worksheet(records_sheet(
        RAW_SHEET,
        raw.iter().map(|r| SCAN_COLUMNS.map(|col| r.get_or_empty(col))),
    )?);
    workbook.save(path)?;

    info!(
        "Wrote workbook {} ({} processed rows, {} raw rows)",
        path.display(),
        processed.len(),
        raw.len()
    );
    Ok(())
}

fn cell_format(style: CellStyle) -> Format {
    let mut format = Format::new();
    if style.border {
        format = format.set_border(FormatBorder::Thin);
    }
    if style.centered {
        format = format
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
    }
    if style.bold {
        format = format.set_bold();
    }
    format
}

fn report_sheet(report: &Report) -> Result<Worksheet> {
    let mut sheet = Worksheet::new();
    sheet.set_name(REPORT_SHEET)?;

    for (row_idx, row) in sheet_rows(report).iter().enumerate() {
        let row_num = row_idx as u32;
        let format = cell_format(row.kind.style());
        for (col_idx, cell) in row.cells.iter().enumerate() {
            let col = col_idx as u16;
            match cell {
                Cell::Count(n) => {
                    sheet.write_number_with_format(row_num, col, *n as f64, &format)?;
                }
                Cell::Text(_) | Cell::Percent(_) => {
                    sheet.write_string_with_format(row_num, col, cell.to_string(), &format)?;
                }
            }
        }
    }
    Ok(sheet)
}

fn records_sheet<'a, I>(name: &str, rows: I) -> Result<Worksheet>
where
    I: Iterator<Item = [&'a str; 7]>,
{
    let mut sheet = Worksheet::new();
    sheet.set_name(name)?;
    for (col, header) in SCAN_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (i, values) in rows.enumerate() {
        let row_num = (i + 1) as u32;
        for (col, value) in values.iter().enumerate() {
            sheet.write_string(row_num, col as u16, *value)?;
        }
    }
    Ok(sheet)
}
