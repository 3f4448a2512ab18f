//! `multas-cli`: library half of the `multas` binary.
//!
//! Portal client, query batch runner and input workbook management live
//! here so they can be tested without spawning the binary.

pub mod db;
pub mod error;
pub mod exit_codes;
pub mod fetch;
pub mod query;

pub use error::CliError;
