//! Scanreport library crate.
//!
//! The stable, supported API surface is exposed via [`crate::api`] and
//! [`crate::prelude`]. These modules are intended for embedding the scan
//! report engine in Rust applications and follow SemVer.
//!
//! Other modules are used by the CLI implementation and may change more
//! frequently.

pub mod api;
pub mod prelude;

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod report;
pub mod router;
pub mod scans;
pub mod session;
pub mod timezone;
