//! Per-source report tables.
//!
//! A query run yields a flat list of `ViolationRecord`s. This module lays
//! them out under the fixed portal schema, headed by the source's
//! identifier label, and drops the placeholder columns before anything
//! reaches disk.

use log::warn;
use multas_core::schema::{is_placeholder_header, PORTAL_COLUMNS};
use multas_core::{QuerySource, Table, ViolationRecord};

/// Header row of a raw (pre-strip) report for `source`: identifier label
/// followed by all 20 portal columns.
pub fn report_headers(source: QuerySource) -> Vec<&'static str> {
    std::iter::once(source.id_label())
        .chain(PORTAL_COLUMNS.iter().map(|c| c.header()))
        .collect()
}

/// Build the report table for one query run.
///
/// Each record becomes `[identifier] + cells`. Short rows are padded with
/// empty cells; cells beyond the schema are dropped. Placeholder columns
/// are stripped from the result.
pub fn build_report_table(source: QuerySource, records: &[ViolationRecord]) -> Table {
    let mut table = Table::new(report_headers(source));

    for record in records {
        if record.extra_cells() > 0 {
            warn!(
                "{}: citation {} has {} cells beyond the known schema, dropping them",
                record.identifier,
                record.violation_code(),
                record.extra_cells()
            );
        }

        let mut row = Vec::with_capacity(table.width());
        row.push(record.identifier.clone());
        row.extend(record.cells.iter().take(PORTAL_COLUMNS.len()).cloned());
        table.push_row(row);
    }

    strip_placeholder_columns(&mut table);
    table
}

/// Remove every `Col_X` placeholder column. Returns the removed headers.
pub fn strip_placeholder_columns(table: &mut Table) -> Vec<String> {
    table.retain_columns(|h| !is_placeholder_header(h))
}
