//! Error types for the lens controller

use ricelens_config::ConfigError;
use thiserror::Error;

/// Lens controller error
#[derive(Debug, Error)]
pub enum LensError {
    /// The host refused to register the provider
    #[error("Lens provider registration failed: {0}")]
    Registration(String),

    /// The annotation provider could not be constructed
    #[error("Lens provider creation failed: {0}")]
    ProviderCreation(String),

    /// Settings could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl LensError {
    pub fn registration(message: impl Into<String>) -> Self {
        LensError::Registration(message.into())
    }

    pub fn provider_creation(message: impl Into<String>) -> Self {
        LensError::ProviderCreation(message.into())
    }
}

/// Result type for lens operations
pub type LensResult<T> = Result<T, LensError>;
