use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// File could not be opened or is not a spreadsheet calamine understands.
    #[error("cannot open {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    /// Named sheet missing or unreadable.
    #[error("{}: cannot read sheet '{sheet}': {reason}", .path.display())]
    Sheet { path: PathBuf, sheet: String, reason: String },

    /// Header row does not contain the expected column.
    #[error("{}: sheet '{sheet}' has no '{column}' column", .path.display())]
    MissingColumn { path: PathBuf, sheet: String, column: String },

    /// Building or saving an xlsx file failed.
    #[error("cannot write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    /// Plain filesystem failure (directory listing, rename, copy).
    #[error("{}: {source}", .path.display())]
    Fs { path: PathBuf, source: std::io::Error },
}

impl IoError {
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Fs { path: path.into(), source }
    }
}
