//! Event emitters and subscription handles
//!
//! Listeners registered with an [`EventEmitter`] stay attached until the
//! returned [`Subscription`] is disposed or dropped. Emission works on a
//! snapshot of the listener table, so a listener may dispose subscriptions
//! (its own included) while it is being notified.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::debug;

/// Callback type for event listeners
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

type ListenerTable<T> = RwLock<Vec<(u64, Listener<T>)>>;

/// A resource whose release is explicit and idempotent
pub trait Disposable: Send {
    /// Release the resource. Calling this more than once has no further effect.
    fn dispose(&mut self);

    /// Whether [`Disposable::dispose`] has already run
    fn is_disposed(&self) -> bool;
}

/// Multi-listener event source
pub struct EventEmitter<T> {
    name: &'static str,
    listeners: Arc<ListenerTable<T>>,
    next_id: AtomicU64,
}

impl<T: 'static> EventEmitter<T> {
    /// Create an emitter; `name` only appears in log output
    pub fn new(name: &'static str) -> Self {
        EventEmitter {
            name,
            listeners: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Attach a listener. It is detached when the returned handle is disposed or dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.write().push((id, Arc::new(listener)));
        debug!(event = self.name, id, "Listener subscribed");

        let table: Weak<ListenerTable<T>> = Arc::downgrade(&self.listeners);
        let name = self.name;
        Subscription::new(move || {
            if let Some(table) = table.upgrade() {
                table.write().retain(|(entry, _)| *entry != id);
                debug!(event = name, id, "Listener unsubscribed");
            }
        })
    }

    /// Deliver `event` to every listener attached at the time of the call, in subscription order
    pub fn emit(&self, event: &T) {
        let listeners: Vec<Listener<T>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        debug!(
            event = self.name,
            listeners = listeners.len(),
            "Emitting event"
        );
        for listener in listeners {
            listener(event);
        }
    }

    /// Number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

impl<T: 'static> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new("event")
    }
}

impl<T> fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("name", &self.name)
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

/// Handle that detaches a listener (or runs any other teardown) exactly once
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a teardown closure
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Subscription {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A handle with nothing to release
    pub fn empty() -> Self {
        Subscription { teardown: None }
    }
}

impl Disposable for Subscription {
    fn dispose(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }

    fn is_disposed(&self) -> bool {
        self.teardown.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_emit_reaches_all_listeners() {
        let emitter: EventEmitter<u32> = EventEmitter::new("test");
        let total = Arc::new(AtomicUsize::new(0));

        let t1 = total.clone();
        let _s1 = emitter.subscribe(move |value| {
            t1.fetch_add(*value as usize, Ordering::SeqCst);
        });
        let t2 = total.clone();
        let _s2 = emitter.subscribe(move |value| {
            t2.fetch_add(*value as usize, Ordering::SeqCst);
        });

        emitter.emit(&3);
        assert_eq!(total.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_dispose_detaches_listener() {
        let emitter: EventEmitter<()> = EventEmitter::new("test");
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let mut subscription = emitter.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        emitter.emit(&());
        subscription.dispose();
        emitter.emit(&());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(emitter.listener_count(), 0);
        assert!(subscription.is_disposed());
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let runs = Arc::new(AtomicUsize::new(0));
        let r = runs.clone();
        let mut subscription = Subscription::new(move || {
            r.fetch_add(1, Ordering::SeqCst);
        });

        subscription.dispose();
        subscription.dispose();
        drop(subscription);

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_detaches_listener() {
        let emitter: EventEmitter<()> = EventEmitter::default();
        {
            let _subscription = emitter.subscribe(|_| {});
            assert_eq!(emitter.listener_count(), 1);
        }
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_emitter() {
        let emitter: EventEmitter<()> = EventEmitter::new("short-lived");
        let mut subscription = emitter.subscribe(|_| {});
        drop(emitter);
        subscription.dispose();
        assert!(subscription.is_disposed());
    }

    #[test]
    fn test_empty_subscription_starts_disposed() {
        assert!(Subscription::empty().is_disposed());
    }
}
