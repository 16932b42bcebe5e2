//! Settings hot reload
//!
//! [`ConfigWatcher`] holds the current settings and notifies listeners each time
//! they are replaced. File-backed watchers subscribe to file system change
//! events and reload on modification; in-memory watchers are fed through
//! [`ConfigWatcher::update`].
//! Notifications carry no payload: listeners read the settings they care about.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use ricelens_common::{EventEmitter, FileWatch, Subscription};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::ConfigResult;
use crate::manager::ConfigManager;
use crate::types::{LensConfig, Settings};

/// Notification that the settings were replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurationChanged;

/// Current settings plus change notification
pub struct ConfigWatcher {
    path: Option<PathBuf>,
    settings: RwLock<Settings>,
    on_did_change: EventEmitter<ConfigurationChanged>,
}

impl ConfigWatcher {
    /// Load settings from `path`; the initial load must succeed
    pub async fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = ConfigManager::expand_home(path.as_ref())?;
        let settings = ConfigManager::load_from_file(&path).await?;

        Ok(ConfigWatcher {
            path: Some(path),
            settings: RwLock::new(settings),
            on_did_change: EventEmitter::new("configuration-changed"),
        })
    }

    /// Watcher over settings that are pushed in through [`ConfigWatcher::update`]
    pub fn from_settings(settings: Settings) -> Self {
        ConfigWatcher {
            path: None,
            settings: RwLock::new(settings),
            on_did_change: EventEmitter::new("configuration-changed"),
        }
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Copy of the current settings
    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    /// Copy of the current `codeLens` section
    pub fn lens_config(&self) -> LensConfig {
        self.settings.read().code_lens.clone()
    }

    /// Listen for settings replacement
    pub fn on_did_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_did_change
            .subscribe(move |_: &ConfigurationChanged| listener())
    }

    /// Replace the settings and notify listeners
    pub fn update(&self, settings: Settings) {
        *self.settings.write() = settings;
        debug!("Settings replaced; notifying listeners");
        self.on_did_change.emit(&ConfigurationChanged);
    }

    /// Re-read the backing file.
    ///
    /// On failure the previous settings stay in place and no notification is sent.
    pub async fn reload(&self) -> ConfigResult<()> {
        let Some(path) = self.path.as_ref() else {
            debug!("In-memory settings have no file to reload");
            return Ok(());
        };

        match ConfigManager::load_from_file(path).await {
            Ok(settings) => {
                info!("Settings reloaded from {}", path.display());
                self.update(settings);
                Ok(())
            }
            Err(e) => {
                warn!("Keeping previous settings; reload failed: {}", e);
                Err(e)
            }
        }
    }

    /// Reload the backing file whenever it changes on disk.
    ///
    /// Bursts of change events within `debounce` cause a single reload. In-memory
    /// watchers have nothing to watch and get an idle handle. Watching stops when
    /// the returned handle is dropped.
    pub fn start_watching(self: &Arc<Self>, debounce: Duration) -> ConfigResult<WatchHandle> {
        let Some(path) = self.path.as_ref() else {
            debug!("In-memory settings have no file to watch");
            return Ok(WatchHandle { task: None });
        };

        let mut changes = FileWatch::file(path, debounce)?;
        info!("Watching settings file {}", path.display());

        let watcher = Arc::clone(self);
        let task = tokio::spawn(async move {
            while changes.changed().await {
                // Failures are logged by reload; the next change retries.
                let _ = watcher.reload().await;
            }
        });

        Ok(WatchHandle { task: Some(task) })
    }
}

/// Running settings file watch; aborted on drop
pub struct WatchHandle {
    task: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Stop watching
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Settings file watcher stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
