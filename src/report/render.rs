use std::io::Write;

use clap::ValueEnum;

use super::{sheet_rows, Report, ReportTable};
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Write `report` to `out` in the requested format.
pub fn render_report(report: &Report, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Table => write_tables(report, out),
        OutputFormat::Csv => write_csv(report, out),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            out.write_all(b"\n")?;
            Ok(())
        }
    }
}

fn write_tables(report: &Report, out: &mut impl Write) -> Result<()> {
    for (i, table) in report.tables().into_iter().enumerate() {
        if i > 0 {
            out.write_all(b"\n")?;
        }
        write_table(table, out)?;
    }
    Ok(())
}

fn write_table(table: &ReportTable, out: &mut impl Write) -> Result<()> {
    let body: Vec<Vec<String>> = table
        .rows
        .iter()
        .chain(table.totals.iter())
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();
    let widths = column_widths(&table.headers, &body);

    writeln!(out, "{}", table.title)?;
    write_table_row(out, table.headers.iter().map(String::as_str), &widths)?;
    write_table_sep(out, &widths)?;
    let split = table.rows.len();
    for (i, row) in body.iter().enumerate() {
        if i == split {
            write_table_sep(out, &widths)?;
        }
        write_table_row(out, row.iter().map(String::as_str), &widths)?;
    }
    Ok(())
}

fn column_widths(headers: &[String], body: &[Vec<String>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .filter_map(|row| row.get(i))
                .map(|v| v.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn write_table_row<'a, I>(out: &mut impl Write, fields: I, widths: &[usize]) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.write_all(b" | ")?;
        }
        let width = widths.get(i).copied().unwrap_or(0);
        out.write_all(field.as_bytes())?;
        let len = field.chars().count();
        if len < width {
            out.write_all(" ".repeat(width - len).as_bytes())?;
        }
    }
    out.write_all(b"\n")?;
    Ok(())
}

fn write_table_sep(out: &mut impl Write, widths: &[usize]) -> Result<()> {
    for (i, w) in widths.iter().copied().enumerate() {
        if i > 0 {
            out.write_all(b"-+-")?;
        }
        out.write_all("-".repeat(w).as_bytes())?;
    }
    out.write_all(b"\n")?;
    Ok(())
}

fn write_csv(report: &Report, out: &mut impl Write) -> Result<()> {
    for row in sheet_rows(report) {
        // A lone empty record would be written as `""`; separators stay bare.
        if row.cells.is_empty() {
            out.write_all(b"\n")?;
            continue;
        }
        let mut writer = csv::WriterBuilder::new().from_writer(&mut *out);
        writer.write_record(row.cells.iter().map(|c| c.to_string()))?;
        writer.flush()?;
    }
    Ok(())
}
