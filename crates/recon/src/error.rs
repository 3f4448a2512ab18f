use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum UnifyError {
    /// Report directory is missing and creating it was not allowed.
    #[error("directory {} does not exist", .dir.display())]
    DirectoryNotFound { dir: PathBuf },

    /// Creating or listing the report directory failed.
    #[error("IO error on {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },

    /// No spreadsheet files to unify.
    #[error("no report files found in {}", .dir.display())]
    EmptyInput { dir: PathBuf },

    /// A report file exists but could not be parsed as a spreadsheet.
    #[error("cannot read report {}: {reason}", .path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    /// A report file lacks a column unification depends on.
    #[error("report {} has no '{column}' column", .path.display())]
    SchemaMismatch { path: PathBuf, column: String },

    /// Report files were found but none had data rows.
    #[error("report files in {} contain no rows", .dir.display())]
    NoData { dir: PathBuf },

    /// Saving the unified report failed.
    #[error("cannot write unified report {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },
}

impl UnifyError {
    /// Stable code for job outcomes and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DirectoryNotFound { .. } => "DIRECTORY_NOT_FOUND",
            Self::Io { .. } => "IO_ERROR",
            Self::EmptyInput { .. } => "EMPTY_INPUT",
            Self::UnreadableFile { .. } => "UNREADABLE_FILE",
            Self::SchemaMismatch { .. } => "SCHEMA_MISMATCH",
            Self::NoData { .. } => "NO_DATA",
            Self::Write { .. } => "IO_ERROR",
        }
    }

    /// Nothing to unify: reported as an unsuccessful outcome, not an error.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyInput { .. } | Self::NoData { .. })
    }
}
