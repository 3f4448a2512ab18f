use multas_config::ConfigError;
use multas_io::IoError;
use multas_recon::UnifyError;

use crate::exit_codes::{
    unify_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_IO, EXIT_SCHEMA, EXIT_USAGE,
};
use crate::fetch::FetchError;

/// Error surfaced to the user: a message, an optional hint line and the
/// process exit code.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        let code = match err {
            IoError::Sheet { .. } | IoError::MissingColumn { .. } => EXIT_SCHEMA,
            _ => EXIT_IO,
        };
        Self::new(code, err.to_string())
    }
}

impl From<UnifyError> for CliError {
    fn from(err: UnifyError) -> Self {
        let hint = match &err {
            UnifyError::DirectoryNotFound { .. } => {
                Some("set create_dirs = true in settings or create the directory".to_string())
            }
            UnifyError::UnreadableFile { .. } => {
                Some("remove or repair the file, then run unify again".to_string())
            }
            _ => None,
        };
        Self { code: unify_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::new(EXIT_CONFIG, err.to_string())
    }
}

impl From<FetchError> for CliError {
    fn from(err: FetchError) -> Self {
        Self::general(err.to_string())
    }
}
