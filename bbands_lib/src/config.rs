//! Dashboard configuration.
//!
//! Values are resolved in layers: built-in defaults, then an optional TOML
//! file, then environment variables. The API token is treated as an opaque
//! secret and is redacted from `Debug` output.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the provider API token.
pub const ENV_API_TOKEN: &str = "EODHD_API_TOKEN";
/// Environment variable overriding the provider base URL.
pub const ENV_BASE_URL: &str = "EODHD_BASE_URL";
/// Environment variable pointing at the workbook file or directory.
pub const ENV_WORKBOOK: &str = "BBANDS_WORKBOOK";

/// Errors from loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("No API token configured (set EODHD_API_TOKEN or api_token in the config file)")]
    MissingApiToken,
    #[error("No workbook configured (set BBANDS_WORKBOOK, workbook in the config file, or --workbook)")]
    MissingWorkbook,
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings injected into the quote client and workbook loader.
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Provider API token. Required only for commands that fetch prices.
    pub api_token: Option<String>,
    pub base_url: String,
    /// Exchange suffix appended to tickers (`SPY` -> `SPY.US`).
    pub exchange: String,
    pub request_timeout_secs: u64,
    /// Spreadsheet file with one worksheet per sector, or a directory of
    /// per-sector CSV sheets.
    pub workbook: Option<PathBuf>,
    /// Maximum tickers analyzed at once when several are requested.
    pub concurrency: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: "https://eodhd.com".to_string(),
            exchange: "US".to_string(),
            request_timeout_secs: 30,
            workbook: None,
            concurrency: 4,
        }
    }
}

impl fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("exchange", &self.exchange)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("workbook", &self.workbook)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl DashboardConfig {
    /// Parses and validates a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Overlays values from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Overlays values from an arbitrary lookup. Empty values are ignored.
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(token) = get(ENV_API_TOKEN) {
            self.api_token = Some(token.trim().to_string());
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url.trim().to_string();
        }
        if let Some(dir) = get(ENV_WORKBOOK) {
            self.workbook = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".to_string()));
        }
        if self.exchange.trim().is_empty() {
            return Err(ConfigError::Invalid("exchange must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The API token, or an error when none is configured.
    pub fn require_api_token(&self) -> Result<&str, ConfigError> {
        self.api_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingApiToken)
    }

    /// The workbook path, or an error when none is configured.
    pub fn require_workbook(&self) -> Result<&Path, ConfigError> {
        self.workbook
            .as_deref()
            .ok_or(ConfigError::MissingWorkbook)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
