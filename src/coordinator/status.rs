// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinator lifecycle and refresh outcomes.

use std::sync::Arc;

use crate::state::DeviceState;

/// Lifecycle of a coordinator.
///
/// `Idle` until the first refresh starts, `Refreshing` while a cycle is in
/// flight, then `Ready` or `Failed` depending on how the last cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinatorStatus {
    /// No refresh has run yet.
    Idle,
    /// A refresh is in flight.
    Refreshing,
    /// The last refresh succeeded.
    Ready,
    /// The last refresh failed; the previous state is still served.
    Failed,
}

impl CoordinatorStatus {
    /// Returns `true` if the last completed refresh succeeded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns `true` if the last completed refresh failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Result of a refresh call that did not fail.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// A new state was stored and dispatched.
    Updated(Arc<DeviceState>),
    /// Another refresh was in flight; nothing was done.
    Skipped,
}

impl RefreshOutcome {
    /// Returns the new state if this call stored one.
    #[must_use]
    pub fn state(&self) -> Option<&Arc<DeviceState>> {
        match self {
            Self::Updated(state) => Some(state),
            Self::Skipped => None,
        }
    }

    /// Returns `true` if the call was skipped.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}
