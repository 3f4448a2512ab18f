//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | General error (unspecified)                      |
//! | 2    | CLI usage error (bad args, wrong file type)      |
//! | 3    | I/O error (workbook, output directory, copy)     |
//! | 4    | Job ran but produced nothing (no input, no data) |
//! | 5    | Report or input workbook schema mismatch         |
//! | 6    | Report file could not be parsed                  |
//! | 7    | Report directory not found                       |
//! | 8    | Settings file unreadable or invalid              |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above and `code_name`
//! 4. Wire it into the relevant command's error handling

use multas_recon::UnifyError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unsupported file type.
pub const EXIT_USAGE: u8 = 2;

/// Reading or writing a workbook, creating a directory, copying a file.
pub const EXIT_IO: u8 = 3;

/// Nothing to do: no identifiers in the input sheet, no citations found,
/// or no report files to unify. Not a crash; the job outcome says why.
pub const EXIT_NO_DATA: u8 = 4;

/// A workbook lacks a sheet or column the job depends on.
pub const EXIT_SCHEMA: u8 = 5;

/// A report file in the unify directory is not a readable spreadsheet.
pub const EXIT_UNREADABLE: u8 = 6;

/// Report directory missing and `create_dirs` is off.
pub const EXIT_DIR_NOT_FOUND: u8 = 7;

/// Settings file exists but cannot be read or parsed.
pub const EXIT_CONFIG: u8 = 8;

/// Stable machine-readable name for an exit code, used in JSON outcomes.
pub fn code_name(code: u8) -> &'static str {
    match code {
        EXIT_SUCCESS => "OK",
        EXIT_USAGE => "USAGE",
        EXIT_IO => "IO_ERROR",
        EXIT_NO_DATA => "NO_DATA",
        EXIT_SCHEMA => "SCHEMA_MISMATCH",
        EXIT_UNREADABLE => "UNREADABLE_FILE",
        EXIT_DIR_NOT_FOUND => "DIRECTORY_NOT_FOUND",
        EXIT_CONFIG => "CONFIG_ERROR",
        _ => "ERROR",
    }
}

/// Map a unification failure to its exit code.
pub fn unify_exit_code(err: &UnifyError) -> u8 {
    match err {
        UnifyError::DirectoryNotFound { .. } => EXIT_DIR_NOT_FOUND,
        UnifyError::Io { .. } | UnifyError::Write { .. } => EXIT_IO,
        UnifyError::EmptyInput { .. } | UnifyError::NoData { .. } => EXIT_NO_DATA,
        UnifyError::UnreadableFile { .. } => EXIT_UNREADABLE,
        UnifyError::SchemaMismatch { .. } => EXIT_SCHEMA,
    }
}
