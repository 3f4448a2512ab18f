// File I/O operations

pub mod error;
pub mod input;
pub mod scan;
pub mod xlsx;

pub use error::IoError;

/// Timestamp format embedded in every generated report file name.
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
