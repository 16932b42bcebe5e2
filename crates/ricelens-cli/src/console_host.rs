//! Lens host that reports to the log instead of an editor
//!
//! Used by `ricelens lens watch` to exercise the controller outside an editor:
//! registrations, provider resets and command-context flags are logged the way
//! an editor would apply them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ricelens_common::Disposable;
use ricelens_lens::{
    AnnotationProvider, AnnotationProviderFactory, CommandContext, CommandContextKey,
    DocumentSelector, LensRegistrar, LensResult,
};
use tracing::info;

/// Provider whose decorations exist only as log lines
#[derive(Debug)]
pub struct ConsoleLensProvider {
    id: u64,
}

impl ConsoleLensProvider {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl AnnotationProvider for ConsoleLensProvider {
    fn reset(&self) {
        info!("Lens provider #{} reset; decorations will be recomputed", self.id);
    }
}

/// Numbers providers in creation order
#[derive(Debug, Default)]
pub struct ConsoleProviderFactory {
    next_id: AtomicU64,
}

impl ConsoleProviderFactory {
    pub fn created(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }
}

impl AnnotationProviderFactory for ConsoleProviderFactory {
    fn create(&self) -> LensResult<Arc<dyn AnnotationProvider>> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Created lens provider #{}", id);
        Ok(Arc::new(ConsoleLensProvider { id }))
    }
}

/// Registrar that accepts every provider
#[derive(Debug, Default)]
pub struct ConsoleRegistrar {
    next_id: AtomicU64,
}

impl LensRegistrar for ConsoleRegistrar {
    fn register(
        &self,
        selector: &DocumentSelector,
        _provider: Arc<dyn AnnotationProvider>,
    ) -> LensResult<Box<dyn Disposable>> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            "Registration #{}: lens provider active for schemes [{}]",
            id,
            selector.schemes().join(", ")
        );
        Ok(Box::new(ConsoleRegistration {
            id,
            disposed: false,
        }))
    }
}

/// Handle returned by [`ConsoleRegistrar`]
#[derive(Debug)]
pub struct ConsoleRegistration {
    id: u64,
    disposed: bool,
}

impl Disposable for ConsoleRegistration {
    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        info!("Registration #{} disposed: lens provider inactive", self.id);
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Command context that logs flag changes
#[derive(Debug, Default)]
pub struct ConsoleCommandContext;

impl CommandContext for ConsoleCommandContext {
    fn set_context(&self, key: CommandContextKey, value: bool) {
        info!("Context {} = {}", key, value);
    }
}
