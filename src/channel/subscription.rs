// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hardware-push subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`PushRegistry`] - Registry storing and dispatching push callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;

/// Unique identifier for a push subscription.
///
/// Returned by [`PropertyChannel::subscribe`](super::PropertyChannel::subscribe)
/// and used to unsubscribe later. IDs are unique within a channel's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a subscription ID with the given value.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Callback invoked for every hardware push.
pub type PushCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Registry of push callbacks for one channel.
///
/// Channel implementations embed a registry and call [`dispatch`](Self::dispatch)
/// whenever the lamp reports a change. Callbacks are cloned out of the lock
/// before being run so a callback may unsubscribe itself.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use lampcore::channel::PushRegistry;
/// use lampcore::state::StateChange;
///
/// let registry = PushRegistry::new();
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = hits.clone();
/// let id = registry.subscribe(Arc::new(move |_: &StateChange| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// registry.dispatch(&StateChange::Power(true));
/// assert!(registry.unsubscribe(id));
/// registry.dispatch(&StateChange::Power(false));
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
pub struct PushRegistry {
    next_id: AtomicU64,
    callbacks: RwLock<HashMap<SubscriptionId, PushCallback>>,
}

impl PushRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback.
    pub fn subscribe(&self, callback: PushCallback) -> SubscriptionId {
        let id = self.next_id();
        self.callbacks.write().insert(id, callback);
        id
    }

    /// Removes a callback. Returns `true` if it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.write().remove(&id).is_some()
    }

    /// Removes every callback.
    pub fn clear(&self) {
        self.callbacks.write().clear();
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    /// Returns `true` if no callback is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.read().is_empty()
    }

    /// Invokes every registered callback with the change.
    pub fn dispatch(&self, change: &StateChange) {
        let callbacks: Vec<PushCallback> = self.callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(change);
        }
    }
}

impl Default for PushRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PushRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushRegistry")
            .field("subscriptions", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn subscription_ids_are_unique() {
        let registry = PushRegistry::new();
        let a = registry.subscribe(Arc::new(|_: &StateChange| {}));
        let b = registry.subscribe(Arc::new(|_: &StateChange| {}));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unsubscribe_unknown_returns_false() {
        let registry = PushRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(42)));
    }

    #[test]
    fn dispatch_reaches_all_subscribers() {
        let registry = PushRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let hits = hits.clone();
            registry.subscribe(Arc::new(move |_: &StateChange| {
                hits.fetch_add(1, Ordering::SeqCst);
            }));
        }

        registry.dispatch(&StateChange::Power(true));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn clear_removes_everything() {
        let registry = PushRegistry::new();
        registry.subscribe(Arc::new(|_: &StateChange| {}));
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn display_format() {
        assert_eq!(SubscriptionId::new(7).to_string(), "Sub(7)");
    }
}
