//! `ricelens remote` - resolve and open hosting-service URLs

use std::path::PathBuf;

use async_trait::async_trait;
use ricelens_config::ConfigManager;
use ricelens_remotes::{
    parse_url, RemoteProvider, RemoteProviderExt, RemoteProviderRegistry, RemoteResource,
    SystemUrlOpener,
};
use tracing::info;

use super::Command;
use crate::error::CliResult;
use crate::output::{OutputStyle, Status};

/// Resolve a resource against a git remote and print or open it
pub struct RemoteCommand {
    remote_url: String,
    resource: RemoteResource,
    config: Option<PathBuf>,
    open: bool,
}

impl RemoteCommand {
    pub fn new(remote_url: impl Into<String>, resource: RemoteResource) -> Self {
        Self {
            remote_url: remote_url.into(),
            resource,
            config: None,
            open: false,
        }
    }

    /// Settings file providing custom remotes
    pub fn with_config(mut self, config: Option<PathBuf>) -> Self {
        self.config = config;
        self
    }

    /// Open the URL instead of printing it
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    async fn registry(&self) -> CliResult<RemoteProviderRegistry> {
        match &self.config {
            Some(path) => {
                let settings = ConfigManager::load_from_file(path).await?;
                Ok(RemoteProviderRegistry::from_settings(&settings.remotes))
            }
            None => Ok(RemoteProviderRegistry::new()),
        }
    }

    async fn provider(&self) -> CliResult<Box<dyn RemoteProvider>> {
        let provider = self
            .registry()
            .await?
            .provider_for_remote_url(&self.remote_url)?;
        info!("Using {} for {}", provider.name(), self.remote_url);
        Ok(provider)
    }

    /// Resolved URL, or `None` when the service has no page for the resource
    pub async fn resolve(&self) -> CliResult<Option<String>> {
        let provider = self.provider().await?;
        match provider.url_for(&self.resource)? {
            Some(url) => Ok(Some(parse_url(&url)?.to_string())),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Command for RemoteCommand {
    async fn execute(&self) -> CliResult<()> {
        let style = OutputStyle::stdout();

        let outcome = if self.open {
            let provider = self.provider().await?;
            provider
                .open(&self.resource, &SystemUrlOpener)
                .await?
                .map(|url| style.line(Status::Done, &format!("Opened {}", url)))
        } else {
            self.resolve().await?
        };

        match outcome {
            Some(line) => println!("{}", line),
            None => println!(
                "{}",
                style.line(Status::Warning, &format!(
                    "{} has no page for this {}",
                    self.remote_url,
                    self.resource.label().to_lowercase()
                ))
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use ricelens_remotes::{LineRange, RemoteError};
    use std::io::Write;

    #[tokio::test]
    async fn test_resolve_builtin_remote() {
        let command = RemoteCommand::new(
            "git@github.com:owner/repo.git",
            RemoteResource::File {
                file_name: "src/main.rs".to_string(),
                branch: Some("main".to_string()),
                range: Some(LineRange::single(42)),
            },
        );

        assert_eq!(
            command.resolve().await.unwrap(),
            Some("https://github.com/owner/repo/blob/main/src/main.rs#L42".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_domain_without_config() {
        let command = RemoteCommand::new("https://git.example.com/team/app.git", RemoteResource::Repo);

        assert!(matches!(
            command.resolve().await,
            Err(CliError::Remote(RemoteError::UnknownProvider(_)))
        ));
    }

    #[tokio::test]
    async fn test_custom_remote_from_config() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "remotes:\n  - type: bitbucket-server\n    domain: git.example.com"
        )
        .unwrap();

        let command = RemoteCommand::new(
            "ssh://git@git.example.com:7999/ops/deploy.git",
            RemoteResource::Commit {
                sha: "beef".to_string(),
            },
        )
        .with_config(Some(file.path().to_path_buf()));

        assert_eq!(
            command.resolve().await.unwrap(),
            Some("https://git.example.com/projects/ops/repos/deploy/commits/beef".to_string())
        );
    }
}
