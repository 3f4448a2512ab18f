// Report directories: listing spreadsheet files and naming new ones.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::debug;

use crate::error::IoError;
use crate::REPORT_TIMESTAMP_FORMAT;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// True for `.xlsx` / `.xls` files (any case) that are not Office lock
/// files (`~$name.xlsx`) or hidden files.
pub fn is_report_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with("~$") || name.starts_with('.') {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SPREADSHEET_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

/// Spreadsheet files directly inside `dir`, sorted by file name.
pub fn list_report_files(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    let entries = fs::read_dir(dir).map_err(|e| IoError::fs(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IoError::fs(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if is_report_file(&path) {
            files.push(path);
        } else {
            debug!("skipping {}", path.display());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// `<prefix><YYYY-MM-DD_HH-MM-SS>.xlsx`
pub fn report_file_name(prefix: &str, at: NaiveDateTime) -> String {
    format!("{prefix}{}.xlsx", at.format(REPORT_TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn recognizes_spreadsheets() {
        assert!(is_report_file(Path::new("/tmp/PLA-CON-2025.xlsx")));
        assert!(is_report_file(Path::new("old.XLS")));
        assert!(!is_report_file(Path::new("~$PLA-CON-2025.xlsx")));
        assert!(!is_report_file(Path::new(".PLA-CON.xlsx.tmp")));
        assert!(!is_report_file(Path::new("notes.csv")));
        assert!(!is_report_file(Path::new("xlsx")));
    }

    #[test]
    fn lists_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.xlsx", "a.xls", "c.txt", "~$b.xlsx"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.xlsx")).unwrap();

        let names: Vec<String> = list_report_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.xls", "b.xlsx"]);
    }

    #[test]
    fn missing_directory_is_fs_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_report_files(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, IoError::Fs { .. }));
    }

    #[test]
    fn timestamped_names() {
        let at = NaiveDate::from_ymd_opt(2025, 2, 24)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        assert_eq!(report_file_name("PLA-CON-", at), "PLA-CON-2025-02-24_09-05-07.xlsx");
    }
}
