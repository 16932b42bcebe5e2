//! URL opening capability

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use url::Url;

use crate::error::{RemoteError, RemoteResult};

/// Opens a URL outside the process (browser, host editor, ...)
#[async_trait]
pub trait UrlOpener: Send + Sync {
    async fn open_url(&self, url: &Url) -> RemoteResult<()>;
}

/// Opens URLs with the platform's default handler
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUrlOpener;

impl SystemUrlOpener {
    #[cfg(target_os = "macos")]
    fn command(url: &Url) -> Command {
        let mut command = Command::new("open");
        command.arg(url.as_str());
        command
    }

    #[cfg(target_os = "windows")]
    fn command(url: &Url) -> Command {
        let mut command = Command::new("cmd");
        // Empty title argument so `start` does not treat the URL as one.
        command.args(["/C", "start", ""]).arg(url.as_str());
        command
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    fn command(url: &Url) -> Command {
        let mut command = Command::new("xdg-open");
        command.arg(url.as_str());
        command
    }
}

#[async_trait]
impl UrlOpener for SystemUrlOpener {
    async fn open_url(&self, url: &Url) -> RemoteResult<()> {
        debug!("Opening {} with the system handler", url);
        let status = Self::command(url)
            .status()
            .await
            .map_err(|e| RemoteError::open(format!("failed to launch opener: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(RemoteError::open(format!("opener exited with {}", status)))
        }
    }
}
