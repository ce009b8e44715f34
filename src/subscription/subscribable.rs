// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish refresh notifications.

use std::sync::Arc;

use crate::error::Error;
use crate::state::DeviceState;
use crate::subscription::{RefreshEvent, StateListener, SubscriptionId};

/// Trait for types that support refresh subscriptions.
///
/// Callbacks run synchronously on the task that completed the refresh, in
/// no particular order. Every observer of one cycle sees the same snapshot.
pub trait Subscribable {
    /// Subscribes to every completed refresh, successful or not.
    fn on_refresh<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RefreshEvent) + Send + Sync + 'static;

    /// Subscribes to successful refreshes.
    ///
    /// The callback receives the state that just became current.
    fn on_state_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static;

    /// Subscribes to failed refreshes.
    ///
    /// The cached state is untouched when this fires.
    fn on_update_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static;

    /// Registers a listener object.
    fn subscribe(&self, listener: Arc<dyn StateListener>) -> SubscriptionId;

    /// Unsubscribes a callback or listener by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
