//! Bring one report file's table into the unified shape.
//!
//! Reports come in several generations: per-source query outputs headed
//! "Placas"/"RUC"/"Cedula", older unified files with Spanish headers, and
//! current unified files. After normalization every table has
//! `Identification` and `Query Type` columns and no placeholders.

use std::path::Path;

use log::{debug, warn};
use multas_core::schema::{canonical_header, IDENTIFICATION, QUERY_TYPE};
use multas_core::{classify, QueryKind, Table};

use crate::error::UnifyError;
use crate::report::strip_placeholder_columns;

/// Normalize `table`, read from `path`.
///
/// Fails with `SchemaMismatch` when no column maps to `Identification`.
/// Rows with an empty identification are dropped.
pub fn normalize_report(mut table: Table, path: &Path) -> Result<Table, UnifyError> {
    rename_headers(&mut table);

    let id_idx = table
        .column_index(IDENTIFICATION)
        .ok_or_else(|| UnifyError::SchemaMismatch {
            path: path.to_path_buf(),
            column: IDENTIFICATION.to_string(),
        })?;

    let before = table.len();
    table.retain_rows(|row| !row[id_idx].trim().is_empty());
    if table.len() < before {
        warn!(
            "{}: dropped {} rows with no identification",
            path.display(),
            before - table.len()
        );
    }

    match table.column_index(QUERY_TYPE) {
        Some(qt_idx) => rederive_invalid_kinds(&mut table, qt_idx, id_idx),
        None => {
            let kinds = table
                .column(id_idx)
                .map(|id| classify(id).as_str().to_string())
                .collect();
            table.insert_column(0, QUERY_TYPE, kinds);
        }
    }

    let removed = strip_placeholder_columns(&mut table);
    if !removed.is_empty() {
        debug!("{}: stripped placeholder columns {:?}", path.display(), removed);
    }

    Ok(table)
}

/// Rename known aliases to canonical headers. The first column that maps to
/// a canonical name wins; later ones keep their original header.
fn rename_headers(table: &mut Table) {
    let renames: Vec<(usize, &'static str)> = table
        .headers()
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| {
            let canonical = canonical_header(header, idx == 0);
            [IDENTIFICATION, QUERY_TYPE]
                .into_iter()
                .find(|&c| c == canonical && header != c)
                .map(|c| (idx, c))
        })
        .collect();

    for (idx, canonical) in renames {
        if !table.has_column(canonical) {
            table.rename_column(idx, canonical);
        }
    }
}

/// Query Type values from legacy files ("PLACA", blanks) are replaced by
/// the classifier's label for the row.
fn rederive_invalid_kinds(table: &mut Table, qt_idx: usize, id_idx: usize) {
    let values: Vec<String> = table
        .rows()
        .iter()
        .map(|row| {
            let current = row[qt_idx].trim();
            if QueryKind::ALL.iter().any(|k| k.as_str() == current) {
                current.to_string()
            } else {
                classify(&row[id_idx]).as_str().to_string()
            }
        })
        .collect();

    for (row, value) in values.into_iter().enumerate() {
        table.set_cell(row, qt_idx, value);
    }
}
