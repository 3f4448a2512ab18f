//! `multas-recon`: report building and unification.
//!
//! Lays query results out as per-source report tables, and merges a
//! directory of report files into one deduplicated unified report.

pub mod error;
pub mod normalize;
pub mod report;
pub mod unify;

pub use error::UnifyError;
pub use normalize::normalize_report;
pub use report::{build_report_table, strip_placeholder_columns};
pub use unify::{unify_directory, unify_tables, UnifyOptions, UnifyReport, UNIFIED_PREFIX};
