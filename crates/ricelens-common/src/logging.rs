//! Logging setup shared by the ricelens binaries
//!
//! Libraries only emit through the `tracing` macros; binaries call [`init`]
//! once at startup to install a formatting subscriber.

use std::str::FromStr;

use thiserror::Error;

/// Minimum level written by the subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse a level name, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARN" => Some(LogLevel::Warn),
            "ERROR" => Some(LogLevel::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn as_tracing(self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::parse(s).ok_or_else(|| LoggingError::UnknownLevel(s.to_string()))
    }
}

/// Logging configuration options
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Minimum log level
    pub level: LogLevel,
    /// Emit ANSI colour codes
    pub ansi: bool,
}

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to install tracing subscriber: {0}")]
    Install(String),

    #[error("Unknown log level '{0}'; expected debug, info, warn or error")]
    UnknownLevel(String),
}

/// Install the global `tracing` subscriber writing to stderr.
///
/// Fails if a global subscriber is already set.
pub fn init(options: LogOptions) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(options.level.as_tracing())
        .with_ansi(options.ansi)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}

/// Format an error together with its cause chain
pub fn format_error(error: &dyn std::error::Error) -> String {
    const MAX_DEPTH: usize = 10;

    let mut message = error.to_string();
    let mut source = error.source();
    let mut depth = 0;
    while let Some(cause) = source {
        if depth >= MAX_DEPTH {
            break;
        }
        message.push_str(" Caused by: ");
        message.push_str(&cause.to_string());
        source = cause.source();
        depth += 1;
    }
    message
}
