use std::path::PathBuf;

use serde::Serialize;

/// Result of one job (a query run or a unification) as shown to the user.
///
/// Failures that are expected in normal use (nothing to query, nothing
/// found) are reported here with `success: false` rather than as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobOutcome {
    pub success: bool,
    pub message: String,
    /// Stable machine-readable reason for a failed outcome (`NO_DATA`, …).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl JobOutcome {
    pub fn written(message: impl Into<String>, path: PathBuf, download_url: Option<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            code: None,
            download_url,
            path: Some(path),
        }
    }

    pub fn failed(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            code: Some(code),
            download_url: None,
            path: None,
        }
    }
}
