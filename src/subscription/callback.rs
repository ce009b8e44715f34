// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for refresh subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`RefreshEvent`] - What observers receive after each refresh cycle
//! - [`CallbackRegistry`] - Registry storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::Error;
use crate::state::DeviceState;

/// Unique identifier for a subscription.
///
/// IDs are unique within a coordinator's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
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

/// Outcome of one completed refresh cycle.
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// A new state replaced the previous one.
    Updated(Arc<DeviceState>),
    /// The cycle failed; the cached state, if any, is unchanged.
    Failed {
        /// Why the cycle failed.
        error: Arc<Error>,
        /// The state still being served.
        last_state: Option<Arc<DeviceState>>,
    },
}

impl RefreshEvent {
    /// Returns the state observers should display after this cycle.
    #[must_use]
    pub fn state(&self) -> Option<&DeviceState> {
        match self {
            Self::Updated(state) => Some(state),
            Self::Failed { last_state, .. } => last_state.as_deref(),
        }
    }

    /// Returns the error if the cycle failed.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Updated(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    /// Returns `true` if the cycle produced a new state.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Observer interface for refresh notifications.
///
/// Both methods default to doing nothing so listeners only implement what
/// they need.
pub trait StateListener: Send + Sync {
    /// Called after a successful refresh with the new state.
    fn state_updated(&self, _state: &DeviceState) {}

    /// Called after a failed refresh.
    fn update_failed(&self, _error: &Error) {}
}

/// Type alias for generic refresh callbacks.
type RefreshCallback = Arc<dyn Fn(&RefreshEvent) + Send + Sync>;

/// Type alias for successful update callbacks.
type UpdatedCallback = Arc<dyn Fn(&DeviceState) + Send + Sync>;

/// Type alias for failed update callbacks.
type FailedCallback = Arc<dyn Fn(&Error) + Send + Sync>;

/// Registry for managing refresh subscription callbacks.
///
/// Uses `parking_lot::RwLock` so registration and dispatch can happen from
/// any task. Callbacks are wrapped in `Arc` and cloned out of the lock
/// before being invoked, so a callback may itself subscribe or unsubscribe.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Callbacks receiving every event.
    refresh_callbacks: RwLock<HashMap<SubscriptionId, RefreshCallback>>,
    /// Callbacks receiving new states.
    updated_callbacks: RwLock<HashMap<SubscriptionId, UpdatedCallback>>,
    /// Callbacks receiving failures.
    failed_callbacks: RwLock<HashMap<SubscriptionId, FailedCallback>>,
    /// Listener objects.
    listeners: RwLock<HashMap<SubscriptionId, Arc<dyn StateListener>>>,
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
            listeners: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for every refresh event.
    pub fn on_refresh<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RefreshEvent) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.refresh_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for successful refreshes.
    pub fn on_state_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.updated_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for failed refreshes.
    pub fn on_update_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.failed_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a listener object.
    pub fn subscribe(&self, listener: Arc<dyn StateListener>) -> SubscriptionId {
        let id = self.next_id();
        self.listeners.write().insert(id, listener);
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.refresh_callbacks.write().remove(&id).is_some()
            || self.updated_callbacks.write().remove(&id).is_some()
            || self.failed_callbacks.write().remove(&id).is_some()
            || self.listeners.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.refresh_callbacks.write().clear();
        self.updated_callbacks.write().clear();
        self.failed_callbacks.write().clear();
        self.listeners.write().clear();
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches a refresh event to every relevant callback.
    pub fn dispatch(&self, event: &RefreshEvent) {
        let refresh: Vec<_> = self.refresh_callbacks.read().values().cloned().collect();
        for callback in refresh {
            callback(event);
        }

        let listeners: Vec<_> = self.listeners.read().values().cloned().collect();

        match event {
            RefreshEvent::Updated(state) => {
                let state: &DeviceState = state;
                let updated: Vec<_> = self.updated_callbacks.read().values().cloned().collect();
                for callback in updated {
                    callback(state);
                }
                for listener in listeners {
                    listener.state_updated(state);
                }
            }
            RefreshEvent::Failed { error, .. } => {
                let error: &Error = error;
                let failed: Vec<_> = self.failed_callbacks.read().values().cloned().collect();
                for callback in failed {
                    callback(error);
                }
                for listener in listeners {
                    listener.update_failed(error);
                }
            }
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks and listeners.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.refresh_callbacks.read().len()
            + self.updated_callbacks.read().len()
            + self.failed_callbacks.read().len()
            + self.listeners.read().len()
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
    use crate::error::ProtocolError;
    use crate::state::normalize;
    use serde_json::json;
    use std::sync::atomic::AtomicU32;

    fn sample_state() -> Arc<DeviceState> {
        Arc::new(normalize(&json!({"TEMP_AIR": 205}), &json!({"SETPOINT_TEMP": 210})).unwrap())
    }

    fn failure() -> RefreshEvent {
        RefreshEvent::Failed {
            error: Arc::new(
                ProtocolError::UpstreamStatus {
                    status: 500,
                    body: String::new(),
                }
                .into(),
            ),
            last_state: None,
        }
    }

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn updated_callback_receives_state() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(RwLock::new(None::<f64>));
        let received_clone = received.clone();

        let id = registry.on_state_updated(move |state| {
            *received_clone.write() = state.air_temperature();
        });

        registry.dispatch(&RefreshEvent::Updated(sample_state()));
        assert_eq!(*received.read(), Some(20.5));

        assert!(registry.unsubscribe(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn failed_callback_only_fires_on_failure() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        registry.on_update_failed(move |error| {
            assert_eq!(error.upstream_status(), Some(500));
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&RefreshEvent::Updated(sample_state()));
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        registry.dispatch(&failure());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn refresh_callback_sees_every_event() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        registry.on_refresh(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&RefreshEvent::Updated(sample_state()));
        registry.dispatch(&failure());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    struct CountingListener {
        updated: AtomicU32,
        failed: AtomicU32,
    }

    impl StateListener for CountingListener {
        fn state_updated(&self, _state: &DeviceState) {
            self.updated.fetch_add(1, Ordering::SeqCst);
        }

        fn update_failed(&self, _error: &Error) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn listener_receives_both_kinds() {
        let registry = CallbackRegistry::new();
        let listener = Arc::new(CountingListener {
            updated: AtomicU32::new(0),
            failed: AtomicU32::new(0),
        });
        registry.subscribe(listener.clone());

        registry.dispatch(&RefreshEvent::Updated(sample_state()));
        registry.dispatch(&failure());
        registry.dispatch(&failure());

        assert_eq!(listener.updated.load(Ordering::SeqCst), 1);
        assert_eq!(listener.failed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let registry_clone = registry.clone();
        let id = Arc::new(RwLock::new(None::<SubscriptionId>));
        let id_clone = id.clone();

        let sub = registry.on_refresh(move |_| {
            if let Some(id) = *id_clone.read() {
                registry_clone.unsubscribe(id);
            }
        });
        *id.write() = Some(sub);

        registry.dispatch(&failure());
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn registry_clear() {
        let registry = CallbackRegistry::new();
        registry.on_refresh(|_| {});
        registry.on_state_updated(|_| {});
        registry.on_update_failed(|_| {});
        assert_eq!(registry.callback_count(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn refresh_event_accessors() {
        let event = RefreshEvent::Updated(sample_state());
        assert!(event.is_success());
        assert!(event.error().is_none());
        assert_eq!(event.state().and_then(DeviceState::air_temperature), Some(20.5));

        let event = failure();
        assert!(!event.is_success());
        assert!(event.state().is_none());
        assert!(event.error().is_some());
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_refresh(|_| {});
        let debug = format!("{registry:?}");
        assert!(debug.contains("CallbackRegistry"));
        assert!(debug.contains("callback_count"));
    }
}
