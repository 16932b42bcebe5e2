//! Host capabilities consumed by the lens controller

use std::sync::Arc;

use ricelens_common::{Disposable, EventEmitter, Subscription};
use ricelens_config::{ConfigWatcher, LensConfig};

use crate::error::LensResult;
use crate::types::{CommandContextKey, DocumentSelector};

/// Callback type for payload-free notifications
pub type Notification = Box<dyn Fn() + Send + Sync>;

/// Settings source. Change notifications carry no payload; the controller
/// re-reads the full lens configuration itself.
pub trait ConfigurationSource: Send + Sync {
    /// Current `codeLens` settings
    fn lens_config(&self) -> LensConfig;

    /// Listen for any settings change, relevant or not
    fn on_did_change(&self, listener: Notification) -> Subscription;
}

/// Source of "underlying git data changed" notifications
pub trait GitCacheSource: Send + Sync {
    fn on_did_change_cache(&self, listener: Notification) -> Subscription;
}

/// Decorates source lines with derived git metadata
pub trait AnnotationProvider: Send + Sync {
    /// Drop cached decorations without unregistering
    fn reset(&self);
}

/// Builds annotation providers
pub trait AnnotationProviderFactory: Send + Sync {
    fn create(&self) -> LensResult<Arc<dyn AnnotationProvider>>;
}

/// Binds providers to the host's rendering pipeline
pub trait LensRegistrar: Send + Sync {
    /// Register `provider` for documents matching `selector`.
    ///
    /// Disposing the returned handle unregisters the provider; a disposed handle
    /// is never reused.
    fn register(
        &self,
        selector: &DocumentSelector,
        provider: Arc<dyn AnnotationProvider>,
    ) -> LensResult<Box<dyn Disposable>>;
}

/// Host command-context sink
pub trait CommandContext: Send + Sync {
    fn set_context(&self, key: CommandContextKey, value: bool);
}

/// Everything the controller needs from its host
#[derive(Clone)]
pub struct LensHost {
    pub configuration: Arc<dyn ConfigurationSource>,
    pub git_cache: Arc<dyn GitCacheSource>,
    pub registrar: Arc<dyn LensRegistrar>,
    pub factory: Arc<dyn AnnotationProviderFactory>,
    pub context: Arc<dyn CommandContext>,
    pub selector: DocumentSelector,
}

impl LensHost {
    /// Host using the default document selector
    pub fn new(
        configuration: Arc<dyn ConfigurationSource>,
        git_cache: Arc<dyn GitCacheSource>,
        registrar: Arc<dyn LensRegistrar>,
        factory: Arc<dyn AnnotationProviderFactory>,
        context: Arc<dyn CommandContext>,
    ) -> Self {
        LensHost {
            configuration,
            git_cache,
            registrar,
            factory,
            context,
            selector: DocumentSelector::default(),
        }
    }

    pub fn with_selector(mut self, selector: DocumentSelector) -> Self {
        self.selector = selector;
        self
    }
}

impl ConfigurationSource for ConfigWatcher {
    fn lens_config(&self) -> LensConfig {
        ConfigWatcher::lens_config(self)
    }

    fn on_did_change(&self, listener: Notification) -> Subscription {
        ConfigWatcher::on_did_change(self, move || listener())
    }
}

/// Notification that cached git data is stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheInvalidated;

/// In-process [`GitCacheSource`] for hosts that detect git changes themselves
#[derive(Debug)]
pub struct GitCacheNotifier {
    on_did_change_cache: EventEmitter<CacheInvalidated>,
}

impl GitCacheNotifier {
    pub fn new() -> Self {
        GitCacheNotifier {
            on_did_change_cache: EventEmitter::new("git-cache-invalidated"),
        }
    }

    /// Tell listeners that cached git data is stale
    pub fn notify(&self) {
        self.on_did_change_cache.emit(&CacheInvalidated);
    }

    pub fn listener_count(&self) -> usize {
        self.on_did_change_cache.listener_count()
    }
}

impl Default for GitCacheNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCacheSource for GitCacheNotifier {
    fn on_did_change_cache(&self, listener: Notification) -> Subscription {
        self.on_did_change_cache
            .subscribe(move |_: &CacheInvalidated| listener())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ricelens_config::Settings;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_git_cache_notifier_delivers() {
        let notifier = GitCacheNotifier::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let subscription = notifier.on_did_change_cache(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        notifier.notify();
        drop(subscription);
        notifier.notify();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.listener_count(), 0);
    }

    #[test]
    fn test_config_watcher_is_a_configuration_source() {
        let watcher = ConfigWatcher::from_settings(Settings::default());
        let source: &dyn ConfigurationSource = &watcher;
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let _subscription = source.on_did_change(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        let mut settings = Settings::default();
        settings.code_lens = LensConfig::new(true, false, true);
        watcher.update(settings);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(source.lens_config().authors_enabled());
    }
}
