//! Lens provider lifecycle controller
//!
//! The controller is either inactive (nothing registered) or active (one
//! provider plus the registration that binds it to the host). Transitions:
//!
//! - configuration change: ignored when the lens settings are structurally equal
//!   to the last processed snapshot; otherwise the provider is reset (already
//!   active), registered (inactive) or unregistered (lenses switched off), and
//!   toggle availability is republished
//! - git cache invalidation: resets the active provider, never touches the
//!   registration
//! - manual toggle: flips between active and inactive while at least one lens
//!   kind is enabled; the override holds until the next configuration change
//!   that needs processing
//!
//! A registration is only recorded after the host has accepted it, so a failed
//! activation leaves the controller inactive without a dangling handle, and the
//! cached snapshot is left untouched so the next configuration event retries.
//!
//! Events are handled one at a time. An event raised from inside a host
//! callback (a registrar that touches the settings, a provider whose reset
//! invalidates the git cache) is deferred and handled right after the event
//! that triggered it, on the same thread.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::thread::{self, ThreadId};

use parking_lot::{Mutex, RwLock};
use ricelens_common::{Disposable, Subscription};
use ricelens_config::LensConfig;
use tracing::{debug, error, info, warn};

use crate::error::LensResult;
use crate::host::{
    AnnotationProvider, AnnotationProviderFactory, CommandContext, ConfigurationSource,
    LensHost, LensRegistrar,
};
use crate::types::{CommandContextKey, DocumentSelector, EditorContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LensEvent {
    ConfigurationChanged,
    GitCacheChanged,
    Toggle,
    Dispose,
}

enum LensState {
    Inactive,
    Active {
        provider: Arc<dyn AnnotationProvider>,
        registration: Box<dyn Disposable>,
    },
}

struct ControllerCore {
    configuration: Arc<dyn ConfigurationSource>,
    registrar: Arc<dyn LensRegistrar>,
    factory: Arc<dyn AnnotationProviderFactory>,
    context: Arc<dyn CommandContext>,
    selector: DocumentSelector,
    cached_config: Option<LensConfig>,
    state: LensState,
    disposed: bool,
}

impl ControllerCore {
    fn new(host: LensHost) -> Self {
        ControllerCore {
            configuration: host.configuration,
            registrar: host.registrar,
            factory: host.factory,
            context: host.context,
            selector: host.selector,
            cached_config: None,
            state: LensState::Inactive,
            disposed: false,
        }
    }

    fn is_active(&self) -> bool {
        matches!(self.state, LensState::Active { .. })
    }

    fn handle(&mut self, event: LensEvent) -> LensResult<()> {
        match event {
            LensEvent::ConfigurationChanged => self.on_configuration_changed(),
            LensEvent::GitCacheChanged => {
                self.on_git_cache_changed();
                Ok(())
            }
            LensEvent::Toggle => self.toggle(),
            LensEvent::Dispose => {
                self.dispose();
                Ok(())
            }
        }
    }

    fn view(&self) -> View {
        View {
            active: self.is_active(),
            cached_config: self.cached_config.clone(),
        }
    }

    fn on_configuration_changed(&mut self) -> LensResult<()> {
        if self.disposed {
            return Ok(());
        }

        let config = self.configuration.lens_config();
        if self.cached_config.as_ref() == Some(&config) {
            debug!("Lens settings unchanged; ignoring configuration change");
            return Ok(());
        }

        info!("Lens settings changed; re-evaluating lens provider");
        self.context.set_context(
            CommandContextKey::CanToggleCodeLens,
            config.any_lens_enabled(),
        );

        if config.should_activate() {
            match &self.state {
                LensState::Active { provider, .. } => {
                    debug!("Resetting active lens provider");
                    provider.reset();
                }
                LensState::Inactive => self.activate()?,
            }
        } else {
            self.deactivate();
        }

        self.cached_config = Some(config);
        Ok(())
    }

    fn on_git_cache_changed(&self) {
        if let LensState::Active { provider, .. } = &self.state {
            info!("Git cache changed; resetting lens provider");
            provider.reset();
        } else {
            debug!("Git cache changed; no lens provider to reset");
        }
    }

    fn toggle(&mut self) -> LensResult<()> {
        if self.disposed {
            return Ok(());
        }

        let can_toggle = self
            .cached_config
            .as_ref()
            .is_some_and(LensConfig::any_lens_enabled);
        if !can_toggle {
            debug!("No lens kind enabled; ignoring toggle");
            return Ok(());
        }

        info!("Toggling lens provider");
        if self.is_active() {
            self.deactivate();
            Ok(())
        } else {
            self.activate()
        }
    }

    /// Build and register a provider, then record both
    fn activate(&mut self) -> LensResult<()> {
        let provider = self.factory.create()?;
        let registration = self
            .registrar
            .register(&self.selector, Arc::clone(&provider))?;

        self.state = LensState::Active {
            provider,
            registration,
        };
        info!("Lens provider registered");
        Ok(())
    }

    fn deactivate(&mut self) {
        if let LensState::Active {
            mut registration, ..
        } = std::mem::replace(&mut self.state, LensState::Inactive)
        {
            registration.dispose();
            info!("Lens provider unregistered");
        }
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.deactivate();
    }
}

/// State readable without entering the core
#[derive(Default)]
struct View {
    active: bool,
    cached_config: Option<LensConfig>,
}

struct Shared {
    core: Mutex<ControllerCore>,
    deferred: Mutex<VecDeque<LensEvent>>,
    handling_thread: Mutex<Option<ThreadId>>,
    view: RwLock<View>,
}

impl Shared {
    /// Handle `event`, or defer it when raised from inside a handler on this thread
    fn dispatch(&self, event: LensEvent) -> LensResult<()> {
        let current = thread::current().id();
        if *self.handling_thread.lock() == Some(current) {
            warn!(
                "{:?} raised while another lens event is being handled; deferring it",
                event
            );
            self.deferred.lock().push_back(event);
            return Ok(());
        }

        let mut core = self.core.lock();
        let _handling = HandlingThread::enter(&self.handling_thread, current);

        let result = core.handle(event);
        while let Some(next) = self.next_deferred() {
            if let Err(e) = core.handle(next) {
                error!("Failed to handle deferred {:?}: {}", next, e);
            }
        }

        *self.view.write() = core.view();
        result
    }

    fn next_deferred(&self) -> Option<LensEvent> {
        self.deferred.lock().pop_front()
    }
}

/// Marks the current thread as handling an event until dropped
struct HandlingThread<'a>(&'a Mutex<Option<ThreadId>>);

impl<'a> HandlingThread<'a> {
    fn enter(slot: &'a Mutex<Option<ThreadId>>, thread: ThreadId) -> Self {
        *slot.lock() = Some(thread);
        HandlingThread(slot)
    }
}

impl Drop for HandlingThread<'_> {
    fn drop(&mut self) {
        *self.0.lock() = None;
    }
}

/// Keeps the lens provider registration in step with settings, git cache
/// invalidation and the manual toggle
pub struct LensProviderController {
    shared: Arc<Shared>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl LensProviderController {
    /// Subscribe to the host's configuration and git cache sources, then apply
    /// the current configuration.
    ///
    /// If the initial evaluation fails the subscriptions are released and the
    /// error is returned.
    pub fn start(host: LensHost) -> LensResult<Self> {
        let configuration = Arc::clone(&host.configuration);
        let git_cache = Arc::clone(&host.git_cache);
        let shared = Arc::new(Shared {
            core: Mutex::new(ControllerCore::new(host)),
            deferred: Mutex::new(VecDeque::new()),
            handling_thread: Mutex::new(None),
            view: RwLock::new(View::default()),
        });

        let weak = Arc::downgrade(&shared);
        let on_config = configuration.on_did_change(Box::new(move || {
            Self::deliver(&weak, LensEvent::ConfigurationChanged)
        }));

        let weak = Arc::downgrade(&shared);
        let on_cache = git_cache.on_did_change_cache(Box::new(move || {
            Self::deliver(&weak, LensEvent::GitCacheChanged)
        }));

        let controller = LensProviderController {
            shared,
            subscriptions: Mutex::new(vec![on_config, on_cache]),
        };
        controller.on_configuration_changed()?;
        Ok(controller)
    }

    fn deliver(shared: &Weak<Shared>, event: LensEvent) {
        if let Some(shared) = shared.upgrade() {
            if let Err(e) = shared.dispatch(event) {
                error!("Failed to handle {:?}: {}", event, e);
            }
        }
    }

    /// Re-read the lens settings and apply them.
    ///
    /// Called from inside a host callback, the change is deferred and `Ok` is
    /// returned; failures of deferred work are logged.
    pub fn on_configuration_changed(&self) -> LensResult<()> {
        self.shared.dispatch(LensEvent::ConfigurationChanged)
    }

    /// Reset the active provider after git data changed
    pub fn on_git_cache_changed(&self) {
        // Resetting never fails.
        let _ = self.shared.dispatch(LensEvent::GitCacheChanged);
    }

    /// Manually register or unregister the provider.
    ///
    /// The editor is accepted for command-handler compatibility; the toggle
    /// always applies to every editor.
    pub fn toggle(&self, _editor: Option<&EditorContext>) -> LensResult<()> {
        self.shared.dispatch(LensEvent::Toggle)
    }

    /// Whether a provider is currently registered
    pub fn is_active(&self) -> bool {
        self.shared.view.read().active
    }

    /// Last fully processed lens settings
    pub fn cached_config(&self) -> Option<LensConfig> {
        self.shared.view.read().cached_config.clone()
    }

    /// Unsubscribe from both sources and unregister the provider.
    ///
    /// Every entry point becomes a no-op afterwards.
    pub fn dispose(&self) {
        for mut subscription in self.subscriptions.lock().drain(..) {
            subscription.dispose();
        }
        if let Err(e) = self.shared.dispatch(LensEvent::Dispose) {
            error!("Failed to dispose lens controller: {}", e);
        }
    }
}

impl Drop for LensProviderController {
    fn drop(&mut self) {
        self.dispose();
    }
}
