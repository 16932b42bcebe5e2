//! Error types for remote resolution

use thiserror::Error;

/// Remote provider error
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Provider path has no `owner/repo` separator
    #[error("Malformed remote path '{path}': expected owner/repository")]
    MalformedPath { path: String },

    /// A resolved URL could not be parsed
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Line range text could not be parsed
    #[error("Invalid line range '{0}': expected START or START-END")]
    InvalidRange(String),

    /// The URL opener failed
    #[error("Failed to open URL: {0}")]
    Open(String),

    /// No provider is known for the domain
    #[error("No remote provider for domain '{0}'")]
    UnknownProvider(String),

    /// Git remote URL could not be split into domain and path
    #[error("Unrecognized git remote URL '{0}'")]
    UnparsableRemote(String),
}

impl RemoteError {
    pub fn malformed_path(path: impl Into<String>) -> Self {
        RemoteError::MalformedPath { path: path.into() }
    }

    pub fn open(message: impl Into<String>) -> Self {
        RemoteError::Open(message.into())
    }
}

/// Result type for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;
