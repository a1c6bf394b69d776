//! Report tables and their sheet layout.
//!
//! [`ReportAssembler`] turns aggregation output into four titled tables.
//! [`sheet_rows`] lays those tables out the way they appear in the exported
//! workbook and in CSV output: title row, header row, body, optional totals,
//! blank separator.

mod render;
mod workbook;

use std::fmt;

use serde::Serialize;

use crate::aggregate::{CategoryCount, CategoryField, TimeSeries};

pub use render::{render_report, OutputFormat};
pub use workbook::{write_workbook, PROCESSED_SHEET, RAW_SHEET, REPORT_SHEET};

pub const TIME_SERIES_TITLE: &str = "Scans Over Time";
pub const OS_TITLE: &str = "Scans by Operating Systems";
pub const TIME_SERIES_HEADERS: [&str; 3] = ["Date", "Total Scans", "Unique Scans"];
pub const TOTAL_LABEL: &str = "Total";

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Count(u64),
    /// A percentage in the 0-100 range.
    Percent(f64),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Count(n) => write!(f, "{n}"),
            Cell::Percent(p) => write!(f, "{p:.2}%"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Vec<Cell>>,
}

impl ReportTable {
    fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            totals: None,
        }
    }
}

/// The four report tables, always in this order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub time_series: ReportTable,
    pub operating_systems: ReportTable,
    pub cities: ReportTable,
    pub countries: ReportTable,
}

impl Report {
    pub fn tables(&self) -> [&ReportTable; 4] {
        [
            &self.time_series,
            &self.operating_systems,
            &self.cities,
            &self.countries,
        ]
    }
}

/// Builds [`Report`]s; the top-N limits only affect table titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportAssembler {
    pub top_cities: usize,
    pub top_countries: usize,
}

impl ReportAssembler {
    pub fn new(top_cities: usize, top_countries: usize) -> Self {
        Self {
            top_cities,
            top_countries,
        }
    }

    pub fn assemble(
        &self,
        temporal: &TimeSeries,
        os: &[CategoryCount],
        cities: &[CategoryCount],
        countries: &[CategoryCount],
    ) -> Report {
        Report {
            time_series: time_series_table(temporal),
            operating_systems: category_table(OS_TITLE, CategoryField::OperatingSystem, os),
            cities: category_table(
                &format!("Scans by Top {} Cities", self.top_cities),
                CategoryField::City,
                cities,
            ),
            countries: category_table(
                &format!("Scans by Top {} Countries", self.top_countries),
                CategoryField::Country,
                countries,
            ),
        }
    }
}

fn time_series_table(series: &TimeSeries) -> ReportTable {
    let mut table = ReportTable::new(TIME_SERIES_TITLE, &TIME_SERIES_HEADERS);
    table.rows = series
        .buckets
        .iter()
        .map(|b| {
            vec![
                Cell::text(b.label.clone()),
                Cell::Count(b.total),
                Cell::Count(b.unique),
            ]
        })
        .collect();
    table.totals = Some(vec![
        Cell::text(TOTAL_LABEL),
        Cell::Count(series.total),
        Cell::Count(series.unique),
    ]);
    table
}

fn category_table(title: &str, field: CategoryField, counts: &[CategoryCount]) -> ReportTable {
    let mut table = ReportTable::new(title, &[field.header(), "Scans", "%"]);
    table.rows = counts
        .iter()
        .map(|c| {
            vec![
                Cell::text(c.value.clone()),
                Cell::Count(c.count),
                Cell::Percent(c.percentage),
            ]
        })
        .collect();
    table
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Title,
    Header,
    Body,
    Total,
    Blank,
}

/// Export styling for every populated cell of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub border: bool,
    pub centered: bool,
    pub bold: bool,
}

impl RowKind {
    pub fn style(self) -> CellStyle {
        CellStyle {
            border: true,
            centered: true,
            bold: matches!(self, RowKind::Title | RowKind::Header),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub kind: RowKind,
    pub cells: Vec<Cell>,
}

impl SheetRow {
    fn new(kind: RowKind, cells: Vec<Cell>) -> Self {
        Self { kind, cells }
    }
}

/// Flatten the report into sheet rows, one block per table.
pub fn sheet_rows(report: &Report) -> Vec<SheetRow> {
    let mut rows = Vec::new();
    for table in report.tables() {
        rows.push(SheetRow::new(RowKind::Title, vec![Cell::text(table.title.clone())]));
        rows.push(SheetRow::new(
            RowKind::Header,
            table.headers.iter().map(|h| Cell::text(h.clone())).collect(),
        ));
        rows.extend(
            table
                .rows
                .iter()
                .map(|r| SheetRow::new(RowKind::Body, r.clone())),
        );
        if let Some(totals) = &table.totals {
            rows.push(SheetRow::new(RowKind::Total, totals.clone()));
        }
        rows.push(SheetRow::new(RowKind::Blank, Vec::new()));
    }
    rows
}
