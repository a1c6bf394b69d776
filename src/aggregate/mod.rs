//! Aggregation passes over a materialized record set.
//!
//! Each call starts from scratch; nothing is carried between calls.

mod categorical;
mod temporal;

pub use categorical::{
    aggregate_by_category, percentage, CategoryCount, CategoryField, CategoryTally,
    DEFAULT_TOP_N, UNKNOWN_CATEGORY,
};
pub use temporal::{
    day_label, window_label, Bucket, BucketMode, TemporalAggregator, TimeSeries,
    DEFAULT_WEEKLY_THRESHOLD_DAYS,
};
