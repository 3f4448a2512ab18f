// Input workbook: one sheet per query source, each a single column of
// identifiers under a named header.

use std::path::Path;

use calamine::Reader;
use multas_core::QuerySource;

use crate::error::IoError;
use crate::xlsx::{cell_to_text, open};

/// Read the identifiers listed under `column` in `sheet`.
///
/// The header is matched case-insensitively on the first row. Blank cells
/// are skipped; values are trimmed but otherwise kept as text.
pub fn read_identifiers(path: &Path, sheet: &str, column: &str) -> Result<Vec<String>, IoError> {
    let mut workbook = open(path)?;

    let range = workbook.worksheet_range(sheet).map_err(|e| IoError::Sheet {
        path: path.to_path_buf(),
        sheet: sheet.to_string(),
        reason: e.to_string(),
    })?;

    let mut rows = range.rows();
    let missing = || IoError::MissingColumn {
        path: path.to_path_buf(),
        sheet: sheet.to_string(),
        column: column.to_string(),
    };

    let header = rows.next().ok_or_else(missing)?;
    let col_idx = header
        .iter()
        .position(|c| cell_to_text(c).trim().eq_ignore_ascii_case(column))
        .ok_or_else(missing)?;

    Ok(rows
        .filter_map(|row| row.get(col_idx))
        .map(|c| cell_to_text(c).trim().to_string())
        .filter(|v| !v.is_empty())
        .collect())
}

/// Identifiers for one query source, read from its sheet of the input workbook.
pub fn read_source_identifiers(path: &Path, source: QuerySource) -> Result<Vec<String>, IoError> {
    read_identifiers(path, source.sheet_name(), source.input_column())
}

/// Sheet names of a workbook; also serves as a "does this open" check.
pub fn sheet_names(path: &Path) -> Result<Vec<String>, IoError> {
    Ok(open(path)?.sheet_names())
}
