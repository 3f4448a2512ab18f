// Report tables <-> xlsx
//
// Read: first worksheet, first row is the header, every cell becomes text.
// Write: one worksheet, every cell written as a string so nothing is
//        reinterpreted as a number when the file is opened again.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use log::debug;
use multas_core::Table;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use crate::error::IoError;

/// Excel's hard row limit (header included).
const MAX_ROWS: usize = 1_048_576;
/// Excel's hard column limit.
const MAX_COLS: usize = 16_384;

/// Render a calamine cell as text.
///
/// Integral floats drop the `.0` (Excel stores every number as f64), text
/// is passed through untouched.
pub fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

pub(crate) fn open(path: &Path) -> Result<Sheets<std::io::BufReader<fs::File>>, IoError> {
    open_workbook_auto(path).map_err(|e| IoError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Read the first worksheet of `path` as a text table.
///
/// Blank rows are skipped. A workbook with no sheets, or a first sheet with
/// no header row, is an `Open` error.
pub fn read_table(path: &Path) -> Result<Table, IoError> {
    let mut workbook = open(path)?;

    let sheet = workbook.sheet_names().first().cloned().ok_or_else(|| IoError::Open {
        path: path.to_path_buf(),
        reason: "workbook contains no sheets".into(),
    })?;

    let range = workbook.worksheet_range(&sheet).map_err(|e| IoError::Sheet {
        path: path.to_path_buf(),
        sheet: sheet.clone(),
        reason: e.to_string(),
    })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| cell_to_text(c).trim().to_string()).collect(),
        None => {
            return Err(IoError::Open {
                path: path.to_path_buf(),
                reason: format!("sheet '{sheet}' is empty"),
            })
        }
    };

    let mut table = Table::new(headers);
    for row in rows {
        let cells: Vec<String> = row.iter().map(cell_to_text).collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        table.push_row(cells);
    }

    debug!("read {} rows x {} columns from {}", table.len(), table.width(), path.display());
    Ok(table)
}

/// Write `table` to `path` as a single-sheet xlsx, all cells as strings.
///
/// The workbook is built in memory, saved next to the target under a hidden
/// temporary name, then renamed into place.
pub fn write_table(path: &Path, table: &Table) -> Result<(), IoError> {
    let write_err = |reason: String| IoError::Write {
        path: path.to_path_buf(),
        reason,
    };

    if table.len() + 1 > MAX_ROWS {
        return Err(write_err(format!("{} rows exceeds the xlsx limit", table.len())));
    }
    if table.width() > MAX_COLS {
        return Err(write_err(format!("{} columns exceeds the xlsx limit", table.width())));
    }

    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();

    for (col, header) in table.headers().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| write_err(e.to_string()))?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let row32 = (row_idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(row32, col as u16, value)
                .map_err(|e| write_err(e.to_string()))?;
        }
    }

    worksheet.autofit();

    let tmp = temp_path(path);
    workbook.save(&tmp).map_err(|e| write_err(e.to_string()))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        IoError::fs(path, e)
    })?;

    debug!("wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// `dir/.name.tmp`: hidden and without a spreadsheet extension, so a
/// directory scan never picks it up.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".into());
    path.with_file_name(format!(".{name}.tmp"))
}
