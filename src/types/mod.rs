// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the normalizer, the coordinator and the adapters.
//!
//! The thermostat reports and accepts temperatures as integers in tenths of
//! a degree Celsius; [`Tenths`] converts outgoing setpoints.

mod preset;
mod setpoint;

pub use preset::PresetMode;
pub use setpoint::{SetpointField, Tenths};
