use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::scans::ScanRecord;

/// Category used for records with no value in the grouped field.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Default row limit for the city and country breakdowns.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: u64,
    /// Share of all records, 0-100, rounded half-up to 2 decimals.
    pub percentage: f64,
}

/// The record fields that get a breakdown table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    OperatingSystem,
    City,
    Country,
}

impl CategoryField {
    pub fn select(self, record: &ScanRecord) -> Option<&str> {
        match self {
            CategoryField::OperatingSystem => record.operating_system.as_deref(),
            CategoryField::City => record.city.as_deref(),
            CategoryField::Country => record.country_name.as_deref(),
        }
    }

    /// Header of the value column in report tables.
    pub fn header(self) -> &'static str {
        match self {
            CategoryField::OperatingSystem => "OS",
            CategoryField::City => "City",
            CategoryField::Country => "Country",
        }
    }
}

/// Counts keyed by category, iterated in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct CategoryTally {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl CategoryTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: &str) {
        match self.index.get(value) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(value.to_string(), self.entries.len());
                self.entries.push((value.to_string(), 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries by descending count; equal counts keep first-seen order.
    pub fn ranked(self) -> Vec<(String, u64)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

/// `count / total * 100`, rounded half-up to 2 decimals. Zero when `total` is 0.
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    // Integer hundredths of a percent keep the rounding exact.
    let (count, total) = (u128::from(count), u128::from(total));
    let hundredths = (count * 20_000 + total) / (2 * total);
    hundredths as f64 / 100.0
}

/// Count records per category value and rank them.
///
/// Percentages are taken against every record passed in, including those
/// counted as [`UNKNOWN_CATEGORY`]. `top_n` truncates after ranking.
pub fn aggregate_by_category<F>(
    records: &[ScanRecord],
    selector: F,
    top_n: Option<usize>,
) -> Vec<CategoryCount>
where
    F: Fn(&ScanRecord) -> Option<&str>,
{
    let mut tally = CategoryTally::new();
    for record in records {
        let value = selector(record)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN_CATEGORY);
        tally.add(value);
    }
    debug!("Tallied {} distinct categories", tally.len());

    let total = records.len() as u64;
    let ranked = tally.ranked();
    let limit = top_n.unwrap_or(ranked.len());
    ranked
        .into_iter()
        .take(limit)
        .map(|(value, count)| CategoryCount {
            percentage: percentage(count, total),
            value,
            count,
        })
        .collect()
}
