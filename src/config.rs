//! Client configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, `config.toml` in
//! the platform config directory, `JBADMIN_*` environment variables, and
//! command-line flags (applied by the binary).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::auth::jwt::REFRESH_THRESHOLD_SECS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file holding tokens; defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_refresh_threshold")]
    pub refresh_threshold_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            refresh_threshold_secs: default_refresh_threshold(),
        }
    }
}

fn default_refresh_threshold() -> i64 {
    REFRESH_THRESHOLD_SECS
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "jbadmin")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reads `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut config: Config = toml::from_str(raw).map_err(|e| e.to_string())?;
        config.normalize();
        Ok(config)
    }

    /// Default file plus environment overrides.
    pub fn load_default() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies `JBADMIN_*` overrides read through `lookup`. Unparsable numbers
    /// are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("JBADMIN_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("JBADMIN_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.api.timeout_secs = timeout;
        }
        if let Some(path) = lookup("JBADMIN_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(path));
        }
        if let Some(threshold) =
            lookup("JBADMIN_REFRESH_THRESHOLD_SECS").and_then(|v| v.parse().ok())
        {
            self.auth.refresh_threshold_secs = threshold;
        }
        self.normalize();
    }

    pub fn set_base_url(&mut self, url: &str) {
        self.api.base_url = url.to_string();
        self.normalize();
    }

    fn normalize(&mut self) {
        let trimmed = self.api.base_url.trim();
        self.api.base_url = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{}/", trimmed)
        };
        if self.api.timeout_secs == 0 {
            self.api.timeout_secs = default_timeout_secs();
        }
    }
}
