//! RiceLens settings
//!
//! This crate owns the settings document read by the lens controller and the
//! remote provider registry:
//! - [`LensConfig`]: the `codeLens` section, compared structurally to decide
//!   whether a configuration event needs processing
//! - [`ConfigManager`]: YAML / JSON / TOML loading and validation
//! - [`ConfigWatcher`]: current settings plus change notification, optionally
//!   reloading the backing file when it changes on disk
//!
//! # Examples
//!
//! ```ignore
//! use ricelens_config::ConfigWatcher;
//!
//! let watcher = ConfigWatcher::load("~/.ricelens/settings.yaml").await?;
//! let _subscription = watcher.on_did_change(|| println!("settings changed"));
//! let _handle = std::sync::Arc::new(watcher).start_watching(std::time::Duration::from_millis(200))?;
//! ```

pub mod error;
pub mod manager;
pub mod types;
pub mod watcher;

pub use error::{ConfigError, ConfigResult};
pub use manager::{ConfigFormat, ConfigManager};
pub use types::{LensCommand, LensConfig, LensLocation, LensSection, RemoteKind, RemoteSettings, Settings};
pub use watcher::{ConfigWatcher, ConfigurationChanged, WatchHandle};
