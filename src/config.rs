//! TOML-backed runtime configuration.
//!
//! Every section and field is optional; anything missing falls back to the
//! defaults below, so an empty file is a valid configuration.

use serde::Deserialize;
use std::path::Path;

use crate::{CubbyError, Result};

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port the server listens on.
    pub port: u16,
    /// Origins allowed through CORS. Empty means permissive mode.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec![],
        }
    }
}

/// Metadata database settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/cubby.db".to_string(),
        }
    }
}

/// Blob storage settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory where file content is kept.
    pub path: String,
    /// Per-user storage allowance, e.g. "500M" or "1G".
    pub quota_limit: String,
    /// Upload size cap in megabytes.
    pub max_upload_size_mb: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "data/blobs".to_string(),
            quota_limit: "1G".to_string(),
            max_upload_size_mb: 10,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level to emit (trace, debug, info, warn, error).
    pub level: String,
    /// File that receives a copy of the log stream.
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: "logs/cubby.log".to_string(),
        }
    }
}

/// Root of the configuration tree.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

fn override_from_env(slot: &mut String, key: &str) {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => *slot = value,
        _ => {}
    }
}

impl Config {
    /// Read and parse a TOML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CubbyError::Io)?;
        Self::parse(&content)
    }

    /// Like [`Config::load`], then applies environment overrides on top.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a TOML string into a config.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CubbyError::Validation(format!("invalid config: {e}")))
    }

    /// Let the environment win over the file for deployment-specific values.
    ///
    /// Recognized variables: `CUBBY_STORAGE_PATH` (blob directory) and
    /// `CUBBY_QUOTA_LIMIT` (per-user allowance). Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        override_from_env(&mut self.storage.path, "CUBBY_STORAGE_PATH");
        override_from_env(&mut self.storage.quota_limit, "CUBBY_QUOTA_LIMIT");
    }

    /// Reject configurations the server could not start with: an
    /// unparsable quota limit or a zero upload cap.
    pub fn validate(&self) -> Result<()> {
        if crate::file::parse_limit(&self.storage.quota_limit).is_err() {
            return Err(CubbyError::Validation(format!(
                "storage.quota_limit '{}' is not a valid size. \
                 Use a plain byte count or a suffixed form like \"500M\" or \"1G\".",
                self.storage.quota_limit
            )));
        }
        if self.storage.max_upload_size_mb == 0 {
            return Err(CubbyError::Validation(
                "storage.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
