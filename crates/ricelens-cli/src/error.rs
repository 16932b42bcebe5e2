// CLI error handling

use ricelens_common::logging::format_error;
use ricelens_common::WatchError;
use ricelens_config::ConfigError;
use ricelens_lens::LensError;
use ricelens_remotes::RemoteError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lens error: {0}")]
    Lens(#[from] LensError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'ricelens --help' for usage information.",
                    message
                )
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Config(e) => {
                format!("Configuration error: {}\n\nCheck the settings file passed with --config.", e)
            }
            CliError::Lens(e) => format!("Lens controller failed: {}", e),
            CliError::Remote(RemoteError::UnknownProvider(domain)) => {
                format!(
                    "No remote provider for '{}'.\n\nAdd it under 'remotes' in a settings file and pass it with --config.",
                    domain
                )
            }
            CliError::Remote(e) => format!("Remote error: {}", e),
            CliError::Watch(e) => format!("Could not watch for changes: {}", e),
        }
    }

    /// Full cause chain, shown in verbose mode
    pub fn technical_details(&self) -> String {
        format_error(self)
    }
}

pub type CliResult<T> = Result<T, CliError>;
