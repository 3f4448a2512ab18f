// Application settings
// Loaded from ~/.config/multas/settings.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

/// Public citation endpoints of the ANT portal.
pub const DEFAULT_BASE_URL: &str = "https://consultaweb.ant.gob.ec/PortalWEB/paginas/clientes";

/// Per-request timeout, seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("invalid settings in {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("cannot write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Input workbook with the PLACA / RUC / CEDULA-IN / CEDULA-EX sheets
    pub db_path: PathBuf,

    /// Where query reports and unified reports are written
    pub output_dir: PathBuf,

    /// Base URL of the portal's JSON endpoints
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Create `output_dir` when missing instead of failing
    pub create_dirs: bool,

    /// Public URL prefix for generated files (e.g. "/static/consultas").
    /// None = no download URL in job results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_prefix: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("db").join("DB-CONSULTA.xlsx"),
            output_dir: default_output_dir(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            create_dirs: true,
            download_prefix: None,
        }
    }
}

/// `~/Desktop/consultas`, falling back to `~/consultas`, then `./consultas`.
fn default_output_dir() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("consultas")
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) if s.starts_with('~') => PathBuf::from(shellexpand::tilde(s).into_owned()),
        _ => path.to_path_buf(),
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("multas")
            .join("settings.toml")
    }

    /// Load settings from the default location. A missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file means defaults; a file that
    /// exists but does not parse is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&contents).map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse settings text. A leading `~` in `db_path` / `output_dir` is
    /// expanded to the home directory.
    pub fn from_toml(input: &str) -> Result<Self, String> {
        let mut settings: Settings = toml::from_str(input).map_err(|e| e.to_string())?;
        settings.db_path = expand_tilde(&settings.db_path);
        settings.output_dir = expand_tilde(&settings.output_dir);
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".into());
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(format!("base_url must be an http(s) URL, got '{}'", self.base_url));
        }
        Ok(())
    }

    /// Save current settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |reason: String| ConfigError::Write {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        let text = toml::to_string_pretty(self).map_err(|e| write_err(e.to_string()))?;
        fs::write(path, text).map_err(|e| write_err(e.to_string()))
    }

    /// Public URL of a generated file, when a download prefix is configured.
    pub fn download_url(&self, file_name: &str) -> Option<String> {
        self.download_prefix
            .as_deref()
            .map(|prefix| format!("{}/{}", prefix.trim_end_matches('/'), file_name))
    }
}
