//! `ricelens lens watch` - run the lens controller against a settings file

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ricelens_common::FileWatch;
use ricelens_config::ConfigWatcher;
use ricelens_lens::{GitCacheNotifier, LensHost, LensProviderController};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::Command;
use crate::console_host::{ConsoleCommandContext, ConsoleProviderFactory, ConsoleRegistrar};
use crate::error::{CliError, CliResult};
use crate::output::{OutputStyle, Status};

/// Files in the git directory whose modification signals that cached git data is stale
const GIT_STATE_FILES: &[&str] = &["HEAD", "index", "FETCH_HEAD"];

/// Watch a settings file and keep a console lens host in sync until Ctrl-C
pub struct LensWatchCommand {
    config: PathBuf,
    debounce: Duration,
    git_dir: Option<PathBuf>,
}

impl LensWatchCommand {
    pub fn new(config: PathBuf) -> Self {
        Self {
            config,
            debounce: Duration::from_millis(200),
            git_dir: None,
        }
    }

    /// Quiet period that folds a burst of file events into one reload
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce = Duration::from_millis(debounce_ms);
        self
    }

    /// Repository whose `.git` state drives cache invalidation
    pub fn with_git_dir(mut self, git_dir: Option<PathBuf>) -> Self {
        self.git_dir = git_dir;
        self
    }
}

#[async_trait]
impl Command for LensWatchCommand {
    async fn execute(&self) -> CliResult<()> {
        let style = OutputStyle::stdout();
        let git_dir = self.git_dir.as_deref().map(git_state_dir).transpose()?;

        let watcher = Arc::new(ConfigWatcher::load(&self.config).await?);
        let git_cache = Arc::new(GitCacheNotifier::new());
        let host = LensHost::new(
            watcher.clone(),
            git_cache.clone(),
            Arc::new(ConsoleRegistrar::default()),
            Arc::new(ConsoleProviderFactory::default()),
            Arc::new(ConsoleCommandContext),
        );

        let controller = LensProviderController::start(host)?;
        let _watch = watcher.start_watching(self.debounce)?;
        let git_task = git_dir
            .map(|dir| spawn_git_watcher(&dir, git_cache.clone(), self.debounce))
            .transpose()?;

        println!(
            "{}",
            style.line(Status::Note, &format!(
                "Watching {} (lens provider {}). Press Ctrl-C to stop.",
                self.config.display(),
                if controller.is_active() { "active" } else { "inactive" }
            ))
        );

        let signal = tokio::signal::ctrl_c().await;

        if let Some(task) = git_task {
            task.abort();
        }
        controller.dispose();
        signal?;

        info!("Received shutdown signal (SIGINT)");
        println!("{}", style.line(Status::Done, "Lens controller stopped"));
        Ok(())
    }
}

/// `<repo>/.git` if present, otherwise the directory itself (bare repos)
fn git_state_dir(dir: &Path) -> CliResult<PathBuf> {
    if !dir.is_dir() {
        return Err(CliError::InvalidArgument {
            message: format!("--git-dir {} is not a directory", dir.display()),
        });
    }

    let dot_git = dir.join(".git");
    Ok(if dot_git.is_dir() {
        dot_git
    } else {
        dir.to_path_buf()
    })
}

/// Invalidate the git cache whenever one of the state files changes
fn spawn_git_watcher(
    git_dir: &Path,
    notifier: Arc<GitCacheNotifier>,
    debounce: Duration,
) -> CliResult<JoinHandle<()>> {
    let mut changes = FileWatch::new(git_dir, GIT_STATE_FILES.iter().copied(), debounce)?;
    info!("Watching git state in {}", git_dir.display());

    let git_dir = git_dir.to_path_buf();
    Ok(tokio::spawn(async move {
        while changes.changed().await {
            debug!("Git state in {} changed", git_dir.display());
            notifier.notify();
        }
    }))
}
