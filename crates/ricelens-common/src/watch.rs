//! File change notification
//!
//! [`FileWatch`] subscribes to the operating system's change events for a set
//! of files in one directory and turns them into an async stream of
//! debounced "something changed" signals.
//!
//! The directory is watched rather than the files themselves so that files
//! replaced by rename (atomic saves, git's lock files) keep being observed.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Errors raised while setting up a file watch
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Cannot watch '{0}': not a directory")]
    NotADirectory(PathBuf),

    #[error("Cannot watch '{0}': path has no file name")]
    NoFileName(PathBuf),

    #[error("File watching error: {0}")]
    Notify(#[from] notify::Error),
}

/// Watch over selected files of a single directory
pub struct FileWatch {
    _watcher: RecommendedWatcher,
    changes: mpsc::UnboundedReceiver<()>,
    debounce: Duration,
}

impl FileWatch {
    /// Watch the files of `dir` named in `names`
    pub fn new<I, S>(dir: impl AsRef<Path>, names: I, debounce: Duration) -> Result<Self, WatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(WatchError::NotADirectory(dir.to_path_buf()));
        }

        let names: Vec<OsString> = names.into_iter().map(Into::into).collect();
        let (tx, changes) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if is_content_change(&event.kind) && touches(&event, &names) {
                        // The receiver is gone once the watch is dropped.
                        let _ = tx.send(());
                    }
                }
                Err(e) => error!("File watching error: {}", e),
            },
            notify::Config::default(),
        )?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        debug!("Watching {}", dir.display());

        Ok(FileWatch {
            _watcher: watcher,
            changes,
            debounce,
        })
    }

    /// Watch a single file
    pub fn file(path: impl AsRef<Path>, debounce: Duration) -> Result<Self, WatchError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .ok_or_else(|| WatchError::NoFileName(path.to_path_buf()))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::new(dir, [name.to_os_string()], debounce)
    }

    /// Wait for the next change.
    ///
    /// Events arriving within the debounce window after the first one are
    /// folded into a single signal. Returns `false` once no more changes can
    /// arrive.
    pub async fn changed(&mut self) -> bool {
        if self.changes.recv().await.is_none() {
            return false;
        }
        tokio::time::sleep(self.debounce).await;
        while self.changes.try_recv().is_ok() {}
        true
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

fn touches(event: &Event, names: &[OsString]) -> bool {
    event.paths.iter().any(|path| {
        path.file_name()
            .is_some_and(|name| names.iter().any(|watched| watched == name))
    })
}
