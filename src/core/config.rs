//! Configuration management with layered hierarchy
//!
//! Resolved once at process start and passed down explicitly. Later layers
//! override earlier ones:
//!
//! 1. Built-in defaults
//! 2. User config (`~/.config/wab/config.yaml`)
//! 3. Explicit config file (`--config <path>`)
//! 4. Environment (`WAB_DB_PATH`, `WAB_DB_PASSWORD`)
//! 5. Command-line flags

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::store::Credential;

/// Default store file, relative to the working directory
pub const DEFAULT_DB_PATH: &str = "warehouse_ab_test.db";

/// Environment variable holding the store credential
pub const PASSWORD_ENV: &str = "WAB_DB_PASSWORD";

/// Environment variable overriding the store path
pub const DB_PATH_ENV: &str = "WAB_DB_PATH";

/// On-disk config file shape. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Path to the SQLite order store
    pub db_path: Option<PathBuf>,

    /// Store credential
    pub db_password: Option<String>,

    /// Significance level used when flagging results
    pub alpha: Option<f64>,
}

/// Values supplied on the command line (highest precedence)
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub db_password: Option<String>,
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub credential: Option<Credential>,
    pub alpha: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            credential: None,
            alpha: 0.05,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("alpha must be between 0 and 1 (got {0})")]
    InvalidAlpha(f64),
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // The user config is optional; an unreadable one is ignored
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(global) = Self::read_file(&global_path) {
                    config.merge(global);
                }
            }
        }

        // An explicitly named file must exist and parse
        if let Some(ref path) = overrides.config_file {
            config.merge(Self::read_file(path)?);
        }

        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            if !path.is_empty() {
                config.db_path = PathBuf::from(path);
            }
        }
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            if !password.is_empty() {
                config.credential = Some(Credential::new(password));
            }
        }

        if let Some(path) = overrides.db_path {
            config.db_path = path;
        }
        if let Some(password) = overrides.db_password {
            config.credential = Some(Credential::new(password));
        }

        if !(config.alpha > 0.0 && config.alpha < 1.0) {
            return Err(ConfigError::InvalidAlpha(config.alpha));
        }

        Ok(config)
    }

    /// Get the path to the user config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "wab")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_yml::from_str::<ConfigFile>(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Merge a config file into this config (file takes precedence)
    fn merge(&mut self, other: ConfigFile) {
        if let Some(path) = other.db_path {
            self.db_path = path;
        }
        if let Some(password) = other.db_password {
            self.credential = Some(Credential::new(password));
        }
        if let Some(alpha) = other.alpha {
            self.alpha = alpha;
        }
    }
}
