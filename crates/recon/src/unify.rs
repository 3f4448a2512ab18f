use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use multas_core::schema::{IDENTIFICATION, QUERY_TYPE, VIOLATION_CODE};
use multas_core::Table;
use multas_io::scan::{list_report_files, report_file_name};
use multas_io::xlsx::{read_table, write_table};
use serde::Serialize;

use crate::error::UnifyError;
use crate::normalize::normalize_report;

/// File name prefix of unified reports.
pub const UNIFIED_PREFIX: &str = "Consulta_Unificada_";

#[derive(Debug, Clone)]
pub struct UnifyOptions {
    /// Create the report directory when it does not exist.
    pub create_dirs: bool,
}

impl Default for UnifyOptions {
    fn default() -> Self {
        Self { create_dirs: true }
    }
}

/// What a successful unification did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifyReport {
    pub output: PathBuf,
    pub files_scanned: usize,
    pub rows_read: usize,
    pub rows_written: usize,
    pub duplicates_removed: usize,
}

/// Merge normalized tables into one unified table.
///
/// Columns are aligned by name in file order. Rows sharing a violation
/// code (blank included) keep only the first occurrence. `Query Type` and
/// `Identification` lead the result. Returns the table and the number of
/// duplicate rows removed.
pub fn unify_tables(tables: Vec<Table>) -> (Table, usize) {
    let mut tables = tables.into_iter();
    let mut unified = tables.next().unwrap_or_default();
    for table in tables {
        unified.append(table);
    }

    let duplicates = match unified.column_index(VIOLATION_CODE) {
        Some(idx) => unified.dedup_by_column(idx),
        None => 0,
    };

    unified.move_to_front(&[QUERY_TYPE, IDENTIFICATION]);
    (unified, duplicates)
}

/// Unify every report in `dir` into a new `Consulta_Unificada_<ts>.xlsx`
/// written to the same directory.
pub fn unify_directory(dir: &Path, options: &UnifyOptions) -> Result<UnifyReport, UnifyError> {
    ensure_dir(dir, options)?;

    let files = list_report_files(dir).map_err(|e| UnifyError::Io {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;
    if files.is_empty() {
        return Err(UnifyError::EmptyInput { dir: dir.to_path_buf() });
    }
    info!("unifying {} report files in {}", files.len(), dir.display());

    let mut tables = Vec::with_capacity(files.len());
    let mut rows_read = 0;
    for path in &files {
        let table = read_table(path).map_err(|e| UnifyError::UnreadableFile {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let table = normalize_report(table, path)?;
        debug!("{}: {} rows", path.display(), table.len());
        rows_read += table.len();
        tables.push(table);
    }

    let (unified, duplicates_removed) = unify_tables(tables);
    if unified.is_empty() {
        return Err(UnifyError::NoData { dir: dir.to_path_buf() });
    }

    let name = report_file_name(UNIFIED_PREFIX, chrono::Local::now().naive_local());
    let output = dir.join(name);
    write_table(&output, &unified).map_err(|e| UnifyError::Write {
        path: output.clone(),
        reason: e.to_string(),
    })?;

    info!(
        "wrote {} rows to {} ({} duplicates removed)",
        unified.len(),
        output.display(),
        duplicates_removed
    );

    Ok(UnifyReport {
        output,
        files_scanned: files.len(),
        rows_read,
        rows_written: unified.len(),
        duplicates_removed,
    })
}

fn ensure_dir(dir: &Path, options: &UnifyOptions) -> Result<(), UnifyError> {
    if dir.is_dir() {
        return Ok(());
    }
    if !options.create_dirs || dir.exists() {
        return Err(UnifyError::DirectoryNotFound { dir: dir.to_path_buf() });
    }

    debug!("creating {}", dir.display());
    fs::create_dir_all(dir).map_err(|e| UnifyError::Io {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })
}
