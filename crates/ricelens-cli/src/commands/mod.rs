// Command handlers for the ricelens CLI

pub mod lens;
pub mod remote;

pub use lens::LensWatchCommand;
pub use remote::RemoteCommand;

use crate::error::CliResult;

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command
    async fn execute(&self) -> CliResult<()>;
}
