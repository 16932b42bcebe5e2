//! Configuration error types

use std::path::PathBuf;

use thiserror::Error;

/// Configuration result type
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} settings: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("Unsupported settings file format: {0}. Use .yaml, .yml, .json or .toml")]
    UnsupportedFormat(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Path resolution error: {0}")]
    PathResolution(String),

    #[error(transparent)]
    Watch(#[from] ricelens_common::WatchError),
}

impl ConfigError {
    /// Create a parse error for the given format
    pub fn parse(format: &'static str, message: impl ToString) -> Self {
        ConfigError::Parse {
            format,
            message: message.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ConfigError::Validation(message.into())
    }
}
