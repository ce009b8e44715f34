// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-mostly views over a [`Coordinator`](crate::Coordinator) for home
//! automation front ends.
//!
//! - [`ThermostatClimate`] - Climate control view: current and target
//!   temperature, HVAC action, preset, setpoint writes
//! - [`ThermostatSensor`] - One sensor reading with its name, unique id,
//!   unit and device class
//!
//! Adapters hold a coordinator clone and read its current state on every
//! call; they never cache values of their own.

mod climate;
mod sensor;

pub use climate::{ClimateAttributes, HvacAction, HvacMode, ThermostatClimate};
pub use sensor::{SensorKind, SensorValue, ThermostatSensor, sensors_for};

/// Unit reported for temperatures.
pub const CELSIUS: &str = "°C";
