//! JSON configuration for the ingester binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable consulted when `--config-file` is not given.
pub const CONFIG_ENV: &str = "CT_INGESTER_CONFIG";

/// Log level used when the file does not set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither a flag nor the environment named a file.
    #[error("No configuration file given (use --config-file or set {CONFIG_ENV})")]
    NotDefined,

    /// The named file does not exist.
    #[error("Configuration file not found: {path}")]
    NotFound {
        /// The missing path.
        path: String,
    },

    /// The file could not be read.
    #[error("IO error reading configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid configuration JSON.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// SQLite database file, created if missing.
    pub path: PathBuf,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Top-level ingester configuration.
///
/// ```json
/// {
///   "database": { "path": "/var/lib/mesh/mesh.db" },
///   "logging": { "level": "debug" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngesterConfig {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl IngesterConfig {
    /// Loads the configuration from `path`.
    ///
    /// `None` means no file was named on the command line or in
    /// [`CONFIG_ENV`].
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let path = path.ok_or(ConfigError::NotDefined)?;
        Self::from_path(path)
    }

    /// Reads and parses a configuration file.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
