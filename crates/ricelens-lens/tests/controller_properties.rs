//! Property-based tests for the lens provider controller
//!
//! Covers settings diffing, toggle availability, registration lifecycle and
//! git cache resets against a recording host.

use parking_lot::Mutex;
use proptest::prelude::*;
use ricelens_common::Disposable;
use ricelens_config::{ConfigWatcher, LensConfig, LensLocation, Settings};
use ricelens_lens::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct HostLog {
    created: AtomicUsize,
    resets: AtomicUsize,
    registered: AtomicUsize,
    unregistered: AtomicUsize,
    flags: Mutex<Vec<bool>>,
    fail_registration: AtomicBool,
}

struct MockProvider(Arc<HostLog>);

impl AnnotationProvider for MockProvider {
    fn reset(&self) {
        self.0.resets.fetch_add(1, Ordering::SeqCst);
    }
}

struct MockFactory(Arc<HostLog>);

impl AnnotationProviderFactory for MockFactory {
    fn create(&self) -> LensResult<Arc<dyn AnnotationProvider>> {
        self.0.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockProvider(self.0.clone())))
    }
}

struct MockRegistration {
    log: Arc<HostLog>,
    disposed: bool,
}

impl Disposable for MockRegistration {
    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.log.unregistered.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

struct MockRegistrar(Arc<HostLog>);

impl LensRegistrar for MockRegistrar {
    fn register(
        &self,
        _selector: &DocumentSelector,
        _provider: Arc<dyn AnnotationProvider>,
    ) -> LensResult<Box<dyn Disposable>> {
        if self.0.fail_registration.load(Ordering::SeqCst) {
            return Err(LensError::registration("host rejected provider"));
        }
        self.0.registered.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockRegistration {
            log: self.0.clone(),
            disposed: false,
        }))
    }
}

struct MockContext(Arc<HostLog>);

impl CommandContext for MockContext {
    fn set_context(&self, _key: CommandContextKey, value: bool) {
        self.0.flags.lock().push(value);
    }
}

struct Harness {
    log: Arc<HostLog>,
    watcher: Arc<ConfigWatcher>,
    git_cache: Arc<GitCacheNotifier>,
    controller: LensProviderController,
}

impl Harness {
    fn start(config: LensConfig) -> Self {
        let log = Arc::new(HostLog::default());
        let watcher = Arc::new(ConfigWatcher::from_settings(settings(config)));
        let git_cache = Arc::new(GitCacheNotifier::new());
        let host = LensHost::new(
            watcher.clone(),
            git_cache.clone(),
            Arc::new(MockRegistrar(log.clone())),
            Arc::new(MockFactory(log.clone())),
            Arc::new(MockContext(log.clone())),
        );
        let controller = LensProviderController::start(host).unwrap();

        Harness {
            log,
            watcher,
            git_cache,
            controller,
        }
    }

    fn set(&self, config: LensConfig) {
        self.watcher.update(settings(config));
    }

    fn registered(&self) -> usize {
        self.log.registered.load(Ordering::SeqCst)
    }

    fn unregistered(&self) -> usize {
        self.log.unregistered.load(Ordering::SeqCst)
    }

    fn resets(&self) -> usize {
        self.log.resets.load(Ordering::SeqCst)
    }

    fn flag_count(&self) -> usize {
        self.log.flags.lock().len()
    }

    fn last_flag(&self) -> Option<bool> {
        self.log.flags.lock().last().copied()
    }
}

fn settings(config: LensConfig) -> Settings {
    Settings {
        code_lens: config,
        ..Default::default()
    }
}

/// Strategy for generating lens settings
fn lens_config_strategy() -> impl Strategy<Value = LensConfig> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec(
            prop_oneof![
                Just(LensLocation::Document),
                Just(LensLocation::Containers),
                Just(LensLocation::Blocks),
                Just(LensLocation::Custom),
            ],
            0..3,
        ),
    )
        .prop_map(|(enabled, recent, authors, debug, locations)| {
            let mut config = LensConfig::new(enabled, recent, authors);
            config.debug = debug;
            config.locations = locations;
            config
        })
}

proptest! {
    /// Re-delivering structurally equal settings causes no side effects
    #[test]
    fn prop_equal_settings_have_no_side_effects(config in lens_config_strategy()) {
        let harness = Harness::start(config.clone());
        let registered = harness.registered();
        let flags = harness.flag_count();

        harness.set(config.clone());
        harness.controller.on_configuration_changed().unwrap();

        prop_assert_eq!(harness.registered(), registered);
        prop_assert_eq!(harness.unregistered(), 0);
        prop_assert_eq!(harness.resets(), 0);
        prop_assert_eq!(harness.flag_count(), flags);
    }

    /// After every processed change the toggle flag tracks the sub-feature switches
    #[test]
    fn prop_toggle_flag_tracks_sub_features(
        first in lens_config_strategy(),
        second in lens_config_strategy(),
    ) {
        let harness = Harness::start(first.clone());
        prop_assert_eq!(harness.last_flag(), Some(first.any_lens_enabled()));

        harness.set(second.clone());
        prop_assert_eq!(harness.last_flag(), Some(second.any_lens_enabled()));
    }

    /// The registered state always follows the last processed settings
    #[test]
    fn prop_active_state_follows_settings(
        configs in prop::collection::vec(lens_config_strategy(), 1..8),
    ) {
        let harness = Harness::start(LensConfig::default());

        for config in configs {
            harness.set(config);
            let cached = harness.controller.cached_config().unwrap();
            prop_assert_eq!(harness.controller.is_active(), cached.should_activate());

            let live = harness.registered() - harness.unregistered();
            prop_assert_eq!(live, usize::from(harness.controller.is_active()));
        }
    }

    /// Inactive to active registers exactly one provider
    #[test]
    fn prop_activation_registers_once(recent in any::<bool>(), authors in any::<bool>()) {
        prop_assume!(recent || authors);
        let harness = Harness::start(LensConfig::new(false, recent, authors));
        prop_assert_eq!(harness.registered(), 0);

        harness.set(LensConfig::new(true, recent, authors));

        prop_assert!(harness.controller.is_active());
        prop_assert_eq!(harness.registered(), 1);
        prop_assert_eq!(harness.log.created.load(Ordering::SeqCst), 1);
    }

    /// A cache invalidation while active resets once and never re-registers
    #[test]
    fn prop_cache_invalidation_resets_once(config in lens_config_strategy()) {
        let harness = Harness::start(config.clone());
        let was_active = harness.controller.is_active();

        harness.git_cache.notify();

        prop_assert_eq!(harness.resets(), usize::from(was_active));
        prop_assert_eq!(harness.registered(), usize::from(was_active));
        prop_assert_eq!(harness.unregistered(), 0);
    }

    /// Toggle is ignored while both lens kinds are off
    #[test]
    fn prop_toggle_noop_without_sub_features(enabled in any::<bool>(), debug in any::<bool>()) {
        let mut config = LensConfig::new(enabled, false, false);
        config.debug = debug;
        let harness = Harness::start(config);

        harness.controller.toggle(None).unwrap();

        prop_assert!(!harness.controller.is_active());
        prop_assert_eq!(harness.registered(), 0);
    }

    /// Two toggles return to the starting registered state
    #[test]
    fn prop_double_toggle_restores_state(config in lens_config_strategy()) {
        prop_assume!(config.any_lens_enabled());
        let harness = Harness::start(config);
        let before = harness.controller.is_active();

        harness.controller.toggle(None).unwrap();
        prop_assert_ne!(harness.controller.is_active(), before);
        harness.controller.toggle(None).unwrap();
        prop_assert_eq!(harness.controller.is_active(), before);
    }
}

#[test]
fn test_registration_failure_leaves_controller_inactive() {
    let harness = Harness::start(LensConfig::new(false, true, true));
    harness.log.fail_registration.store(true, Ordering::SeqCst);

    harness.set(LensConfig::new(true, true, true));

    assert!(!harness.controller.is_active());
    assert_eq!(harness.registered(), 0);
    assert_eq!(harness.resets(), 0);

    // The change is retried by the next event once the host recovers.
    harness.log.fail_registration.store(false, Ordering::SeqCst);
    harness.set(LensConfig::new(true, true, true));
    assert!(harness.controller.is_active());
    assert_eq!(harness.registered(), 1);
}

#[test]
fn test_dispose_stops_all_reactions() {
    let harness = Harness::start(LensConfig::new(true, true, false));
    harness.controller.dispose();

    harness.set(LensConfig::new(true, false, true));
    harness.git_cache.notify();
    harness.controller.toggle(None).unwrap();

    assert_eq!(harness.registered(), 1);
    assert_eq!(harness.unregistered(), 1);
    assert_eq!(harness.resets(), 0);
    assert_eq!(harness.git_cache.listener_count(), 0);
}
