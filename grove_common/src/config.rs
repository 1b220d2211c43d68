//! TOML configuration loading.
//!
//! Any `Deserialize` type can be read from disk through [`ConfigLoader`];
//! the HAL's own file layout lives in [`crate::hal::config`]. Every Grove
//! config file starts with a `[shared]` table:
//!
//! ```toml
//! [shared]
//! log_level = "debug"
//! service_name = "grove-demo"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration loading and validation errors.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// No file at the given path.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("Failed to read {}: {message}", path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// OS error text
        message: String,
    },

    /// Invalid TOML, a missing required key or an unknown field.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Parsed values that break a cross-field rule.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// `log_level` values accepted in `[shared]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Per-sample polling detail.
    Trace,
    /// Driver creation and every published event.
    Debug,
    /// Lifecycle and loop summaries.
    #[default]
    Info,
    /// Read errors and failed halts.
    Warn,
    /// Startup failures only.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// The `[shared]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharedConfig {
    /// Default tracing level; `RUST_LOG` and `-v` override it.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Name used in log lines.
    pub service_name: String,
}

impl SharedConfig {
    /// Reject a blank `service_name`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reads a config type from a TOML file or string.
///
/// Blanket-implemented for every `DeserializeOwned` type. Loading only
/// parses; callers run their own `validate()` afterwards.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Read and parse the file at `path`.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "reading configuration");
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        Self::from_toml(&content)
    }

    /// Parse `content` as TOML.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
