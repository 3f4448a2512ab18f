//! `multas-core`: shared types for citation reports.
//!
//! Pure crate: identifier classification, the portal's column schema,
//! citation records and the all-text `Table` every report is built from.
//! No IO dependencies.

pub mod identifier;
pub mod outcome;
pub mod record;
pub mod schema;
pub mod source;
pub mod table;

pub use identifier::{classify, QueryKind};
pub use outcome::JobOutcome;
pub use record::ViolationRecord;
pub use schema::PortalColumn;
pub use source::QuerySource;
pub use table::Table;
