// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical thermostat state and the normalizer that produces it.
//!
//! The device exposes two JSON documents: a status document with live
//! readings and a settings document with the preset and setpoints.
//! [`normalize`] combines one of each into an immutable [`DeviceState`].
//!
//! # Examples
//!
//! ```
//! use airobot_lib::state::normalize;
//! use airobot_lib::types::PresetMode;
//! use serde_json::json;
//!
//! let status = json!({"TEMP_AIR": 215, "HUM_AIR": 450, "CO2": 65535});
//! let settings = json!({"MODE": 1, "SETPOINT_TEMP": 210, "SETPOINT_TEMP_AWAY": 180});
//!
//! let state = normalize(&status, &settings)?;
//! assert_eq!(state.air_temperature(), Some(21.5));
//! assert_eq!(state.co2_ppm(), None);
//! assert_eq!(state.preset_mode(), PresetMode::Home);
//! # Ok::<(), airobot_lib::ParseError>(())
//! ```

mod device_state;
mod normalizer;
mod payload;

pub use device_state::DeviceState;
pub use normalizer::normalize;
pub use payload::{SettingsPayload, StatusFlags, StatusPayload};
