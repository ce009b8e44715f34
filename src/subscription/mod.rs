// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for refresh notifications.
//!
//! After every completed refresh the coordinator dispatches a
//! [`RefreshEvent`] to all registered observers: either the new
//! [`DeviceState`](crate::state::DeviceState) or the error that aborted the
//! cycle. Observers register closures or [`StateListener`] implementations
//! and get a [`SubscriptionId`] back for unsubscribing.
//!
//! # Usage
//!
//! ```no_run
//! use airobot_lib::{Coordinator, ThermostatConfig};
//! use airobot_lib::subscription::Subscribable;
//!
//! # async fn example() -> airobot_lib::Result<()> {
//! let config = ThermostatConfig::new("192.168.1.40", "T0012AB", "secret");
//! let coordinator = Coordinator::from_config(&config)?;
//!
//! let sub_id = coordinator.on_state_updated(|state| {
//!     println!("Room is at {:?} °C", state.air_temperature());
//! });
//!
//! coordinator.refresh().await?;
//! coordinator.unsubscribe(sub_id);
//! # Ok(())
//! # }
//! ```

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, RefreshEvent, StateListener, SubscriptionId};
pub use subscribable::Subscribable;
