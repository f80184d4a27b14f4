// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for refresh subscriptions.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::coordinator::RefreshEvent;
use crate::error::RefreshError;
use crate::state::Snapshot;

/// Unique identifier for a subscription.
///
/// IDs are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
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

type RefreshCallback = Arc<dyn Fn(&RefreshEvent) + Send + Sync>;
type UpdatedCallback = Arc<dyn Fn(&Snapshot) + Send + Sync>;
type FailedCallback = Arc<dyn Fn(&RefreshError) + Send + Sync>;

/// Registry of refresh listeners.
///
/// Callbacks are cloned out of the lock before they run, so a callback may
/// subscribe or unsubscribe without deadlocking.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    refresh_callbacks: RwLock<HashMap<SubscriptionId, RefreshCallback>>,
    updated_callbacks: RwLock<HashMap<SubscriptionId, UpdatedCallback>>,
    failed_callbacks: RwLock<HashMap<SubscriptionId, FailedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            refresh_callbacks: RwLock::new(HashMap::new()),
            updated_callbacks: RwLock::new(HashMap::new()),
            failed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for every refresh attempt.
    pub fn on_refresh<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RefreshEvent) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.refresh_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for successful refreshes.
    pub fn on_snapshot_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.updated_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for failed refreshes.
    pub fn on_refresh_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RefreshError) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.failed_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.refresh_callbacks.write().remove(&id).is_some()
            || self.updated_callbacks.write().remove(&id).is_some()
            || self.failed_callbacks.write().remove(&id).is_some()
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches a refresh outcome to the relevant callbacks.
    pub fn dispatch(&self, event: &RefreshEvent) {
        let callbacks: Vec<RefreshCallback> =
            self.refresh_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(event);
        }

        match event {
            RefreshEvent::Updated(snapshot) => {
                let callbacks: Vec<UpdatedCallback> =
                    self.updated_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(snapshot);
                }
            }
            RefreshEvent::Failed(error) => {
                let callbacks: Vec<FailedCallback> =
                    self.failed_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(error);
                }
            }
        }
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.refresh_callbacks.read().len()
            + self.updated_callbacks.read().len()
            + self.failed_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    use crate::state::{AppList, Settings};

    fn updated() -> RefreshEvent {
        RefreshEvent::Updated(Arc::new(Snapshot::new(
            Settings::default(),
            AppList::default(),
        )))
    }

    fn failed() -> RefreshEvent {
        RefreshEvent::Failed(RefreshError::Transport("refused".to_string()))
    }

    #[test]
    fn ids_are_unique() {
        let registry = CallbackRegistry::new();
        let a = registry.on_refresh(|_| {});
        let b = registry.on_refresh(|_| {});
        assert_ne!(a, b);
        assert_eq!(registry.callback_count(), 2);
    }

    #[test]
    fn refresh_callbacks_see_every_attempt() {
        let registry = CallbackRegistry::new();
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = Arc::clone(&count);
        registry.on_refresh(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&updated());
        registry.dispatch(&failed());

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn typed_callbacks_are_filtered() {
        let registry = CallbackRegistry::new();
        let updates = Arc::new(AtomicU32::new(0));
        let failures = Arc::new(AtomicU32::new(0));

        let updates_clone = Arc::clone(&updates);
        registry.on_snapshot_updated(move |_| {
            updates_clone.fetch_add(1, Ordering::SeqCst);
        });
        let failures_clone = Arc::clone(&failures);
        registry.on_refresh_failed(move |_| {
            failures_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&updated());
        registry.dispatch(&updated());
        registry.dispatch(&failed());

        assert_eq!(updates.load(Ordering::SeqCst), 2);
        assert_eq!(failures.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_removes_callback() {
        let registry = CallbackRegistry::new();
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = Arc::clone(&count);
        let id = registry.on_refresh_failed(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.dispatch(&failed());

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let slot = Arc::new(parking_lot::Mutex::new(None::<SubscriptionId>));

        let registry_clone = Arc::clone(&registry);
        let slot_clone = Arc::clone(&slot);
        let id = registry.on_refresh(move |_| {
            if let Some(id) = *slot_clone.lock() {
                registry_clone.unsubscribe(id);
            }
        });
        *slot.lock() = Some(id);

        registry.dispatch(&updated());
        assert!(registry.is_empty());
    }
}
