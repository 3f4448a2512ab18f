//! `multas db`: manage the input workbook (import, export, check).

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use multas_config::Settings;
use multas_core::QuerySource;
use multas_io::input::{read_source_identifiers, sheet_names};
use serde::Serialize;

use crate::error::CliError;
use crate::exit_codes::{EXIT_SCHEMA, EXIT_UNREADABLE};

/// Replace the input workbook with `file`. Only `.xlsx` workbooks that
/// open cleanly are accepted.
pub fn import(file: &Path, settings: &Settings) -> Result<PathBuf, CliError> {
    let is_xlsx = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);
    if !is_xlsx {
        return Err(CliError::args(format!("{} is not an .xlsx file", file.display()))
            .with_hint("save the workbook as Excel Workbook (.xlsx) and retry"));
    }

    let sheets = sheet_names(file).map_err(|e| CliError::new(EXIT_UNREADABLE, e.to_string()))?;
    for source in QuerySource::ALL {
        if !sheets.iter().any(|s| s == source.sheet_name()) {
            warn!("{} has no {} sheet; {} queries will fail", file.display(), source.sheet_name(), source);
        }
    }

    let dest = &settings.db_path;
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| CliError::io(format!("cannot create {}: {}", parent.display(), e)))?;
    }
    fs::copy(file, dest).map_err(|e| {
        CliError::io(format!("cannot copy {} to {}: {}", file.display(), dest.display(), e))
    })?;

    info!("imported {} as {}", file.display(), dest.display());
    Ok(dest.clone())
}

/// Copy the current input workbook to `dest`.
pub fn export(dest: &Path, settings: &Settings) -> Result<(), CliError> {
    let src = &settings.db_path;
    if !src.is_file() {
        return Err(CliError::io(format!("no input workbook at {}", src.display()))
            .with_hint("run `multas db import <file.xlsx>` first"));
    }
    fs::copy(src, dest).map_err(|e| {
        CliError::io(format!("cannot copy {} to {}: {}", src.display(), dest.display(), e))
    })?;
    info!("exported {} to {}", src.display(), dest.display());
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct SheetStatus {
    pub source: QuerySource,
    pub sheet: &'static str,
    pub column: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Identifier count per source sheet. Missing sheets or columns are
/// reported per row, not as an error; an unopenable workbook is.
pub fn check(settings: &Settings) -> Result<Vec<SheetStatus>, CliError> {
    let path = &settings.db_path;
    sheet_names(path).map_err(|e| {
        CliError::new(EXIT_UNREADABLE, e.to_string())
            .with_hint("run `multas db import <file.xlsx>` to replace it")
    })?;

    Ok(QuerySource::ALL
        .into_iter()
        .map(|source| {
            let (identifiers, error) = match read_source_identifiers(path, source) {
                Ok(ids) => (Some(ids.len()), None),
                Err(e) => (None, Some(e.to_string())),
            };
            SheetStatus {
                source,
                sheet: source.sheet_name(),
                column: source.input_column(),
                identifiers,
                error,
            }
        })
        .collect())
}

/// Exit code for a finished check: schema error if any sheet is unusable.
pub fn check_exit_code(statuses: &[SheetStatus]) -> Option<u8> {
    statuses.iter().any(|s| s.error.is_some()).then_some(EXIT_SCHEMA)
}
