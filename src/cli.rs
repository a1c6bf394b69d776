use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::report::OutputFormat;

#[derive(Parser)]
#[command(name = "scanreport")]
#[command(about = "Summarize QR code scan exports into time-series and top-category reports.")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Hide progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Engine overrides shared by the data commands. Unset flags fall back to config.
#[derive(Args, Clone, Debug, Default)]
pub struct EngineArgs {
    /// Hours added to source timestamps to get display time (default: -5)
    #[arg(long, allow_hyphen_values = true)]
    pub offset_hours: Option<i32>,

    /// Switch to weekly buckets when the range spans more than N days (default: 35)
    #[arg(long, value_name = "N")]
    pub weekly_threshold: Option<i64>,

    /// Rows in the city and country tables (default: 5)
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct RangeArgs {
    /// Range start (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS, display timezone)
    #[arg(long)]
    pub from: Option<String>,

    /// Range end (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS, display timezone)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the scan report tables for a CSV export
    Report {
        /// Scan CSV file
        file: PathBuf,

        #[command(flatten)]
        range: RangeArgs,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Write the scan report workbook (.xlsx)
    Export {
        /// Scan CSV file
        file: PathBuf,

        /// Output workbook (default: qr_code_scans_data.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        range: RangeArgs,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Show row, timestamp and date-bound stats for a CSV export (script-friendly)
    Stats {
        /// Scan CSV file
        file: PathBuf,

        /// Output as JSON (also enabled by `[stats] json = true`)
        #[arg(long)]
        json: bool,

        /// Hours added to source timestamps to get display time (default: -5)
        #[arg(long, allow_hyphen_values = true)]
        offset_hours: Option<i32>,
    },

    /// Convert a timestamp from source to display time
    Convert {
        /// Timestamp to convert
        timestamp: String,

        /// Convert display time back to source time
        #[arg(long)]
        reverse: bool,

        /// Hours added to source timestamps to get display time (default: -5)
        #[arg(long, allow_hyphen_values = true)]
        offset_hours: Option<i32>,
    },

    /// Print the resolved configuration
    Config,

    /// Generate shell completions
    #[cfg(feature = "completions")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
