//! Observer registry for identity changes.
//!
//! Callbacks run on the thread that completed the mutation, from a snapshot of the
//! registry taken before the first call. A callback may therefore subscribe or
//! unsubscribe (itself or others) without deadlocking; changes apply from the next
//! notification on.

use crate::identity::AuthState;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Callback = Arc<dyn Fn(&AuthState) + Send + Sync>;

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    callbacks: Mutex<BTreeMap<u64, Callback>>,
}

impl ListenerRegistry {
    pub(crate) fn subscribe(
        self: &Arc<Self>,
        callback: impl Fn(&AuthState) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.callbacks.lock().insert(id, Arc::new(callback));
        Subscription {
            id,
            registry: Arc::downgrade(self),
            detached: false,
        }
    }

    pub(crate) fn notify(&self, state: &AuthState) {
        let snapshot: Vec<Callback> = self.callbacks.lock().values().cloned().collect();
        for callback in snapshot {
            callback(state);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.callbacks.lock().len()
    }

    fn remove(&self, id: u64) -> bool {
        self.callbacks.lock().remove(&id).is_some()
    }
}

/// Handle returned by [`IdentityProvider::subscribe`](crate::identity::IdentityProvider::subscribe).
///
/// Dropping it unsubscribes. Use [`Subscription::detach`] to keep the listener for
/// the lifetime of the provider.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
    detached: bool,
}

impl Subscription {
    /// Stops delivery to this listener. Calling it again does nothing.
    ///
    /// Returns whether this call removed the listener.
    pub fn unsubscribe(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.remove(self.id))
    }

    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.detached {
            self.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn state() -> AuthState {
        AuthState {
            user: None,
            is_loading: false,
        }
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let registry = Arc::new(ListenerRegistry::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let subscription = registry.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registry.notify(&state());
        assert!(subscription.unsubscribe());
        assert!(!subscription.unsubscribe());
        registry.notify(&state());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_unsubscribe_from_inside_callback() {
        let registry = Arc::new(ListenerRegistry::default());
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(AtomicUsize::new(0));

        let own = slot.clone();
        let counter = calls.clone();
        let subscription = registry.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(subscription) = own.lock().take() {
                subscription.unsubscribe();
            }
        });
        *slot.lock() = Some(subscription);

        registry.notify(&state());
        registry.notify(&state());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_unsubscribes_but_detach_keeps() {
        let registry = Arc::new(ListenerRegistry::default());
        drop(registry.subscribe(|_| {}));
        assert_eq!(registry.len(), 0);

        registry.subscribe(|_| {}).detach();
        assert_eq!(registry.len(), 1);
    }
}
