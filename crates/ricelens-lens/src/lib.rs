//! RiceLens lens lifecycle
//!
//! [`LensProviderController`] keeps at most one annotation provider registered
//! with the host editor. It reacts to two independent event sources:
//! - configuration changes, which register, reset or unregister the provider
//! - git cache invalidation, which resets the registered provider
//!
//! and to a manual [`LensProviderController::toggle`] that overrides the
//! configuration until the next relevant configuration change.
//!
//! The host side (registration, provider construction, command context) is
//! abstracted by the traits in [`host`].

pub mod controller;
pub mod error;
pub mod host;
pub mod types;

pub use controller::LensProviderController;
pub use error::{LensError, LensResult};
pub use host::{
    AnnotationProvider, AnnotationProviderFactory, CacheInvalidated, CommandContext,
    ConfigurationSource, GitCacheNotifier, GitCacheSource, LensHost, LensRegistrar,
};
pub use types::{CommandContextKey, DocumentSelector, EditorContext};
