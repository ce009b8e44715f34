// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw payloads as served by the thermostat.
//!
//! Every field is optional: the firmware omits readings for sensors a
//! model does not have. Temperatures and humidity are in tenths.

use serde::{Deserialize, Deserializer};

/// Body of the status endpoint.
///
/// # Examples
///
/// ```
/// use airobot_lib::state::StatusPayload;
///
/// let json = r#"{"TEMP_AIR":215,"CO2":612,"STATUS_FLAGS":[{"HEATING_ON":1}]}"#;
/// let status: StatusPayload = serde_json::from_str(json).unwrap();
///
/// assert_eq!(status.temp_air, Some(215.0));
/// assert_eq!(status.co2, Some(612));
/// assert!(status.heating_on());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusPayload {
    /// CO2 in ppm, `65535` when the model has no sensor.
    #[serde(rename = "CO2", default, deserialize_with = "integral")]
    pub co2: Option<i64>,

    /// Relative humidity in tenths of a percent.
    #[serde(rename = "HUM_AIR", default)]
    pub hum_air: Option<f64>,

    /// Air temperature in tenths of a degree.
    #[serde(rename = "TEMP_AIR", default)]
    pub temp_air: Option<f64>,

    /// Floor temperature in tenths of a degree.
    #[serde(rename = "TEMP_FLOOR", default)]
    pub temp_floor: Option<f64>,

    /// Air quality index.
    #[serde(rename = "AQI", default, deserialize_with = "integral")]
    pub aqi: Option<i64>,

    /// Status flag blocks; only the first one is meaningful.
    #[serde(rename = "STATUS_FLAGS", default)]
    pub status_flags: Option<Vec<StatusFlags>>,
}

impl StatusPayload {
    /// Returns the heating flag of the first status block, `false` if absent.
    #[must_use]
    pub fn heating_on(&self) -> bool {
        self.status_flags
            .as_deref()
            .and_then(<[StatusFlags]>::first)
            .and_then(|flags| flags.heating_on)
            .is_some_and(FlagValue::is_set)
    }
}

/// Reads a number that must be integral but may be sent as `640` or `640.0`.
fn integral<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if !raw.is_finite() || raw.fract() != 0.0 {
        return Err(serde::de::Error::custom(format!(
            "expected an integer, found {raw}"
        )));
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(Some(raw as i64))
}

/// One entry of `STATUS_FLAGS`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusFlags {
    /// Heating output, reported as `0`/`1` or as a boolean.
    #[serde(rename = "HEATING_ON", default)]
    pub heating_on: Option<FlagValue>,
}

/// A flag the firmware encodes either as a number or a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// JSON boolean.
    Bool(bool),
    /// JSON integer, non-zero means set.
    Int(i64),
}

impl FlagValue {
    /// Coerces the flag to a boolean.
    #[must_use]
    pub fn is_set(self) -> bool {
        match self {
            Self::Bool(b) => b,
            Self::Int(n) => n != 0,
        }
    }
}

/// Body of the settings endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPayload {
    /// Preset mode, `1` for Home and `2` for Away.
    #[serde(rename = "MODE", default)]
    pub mode: Option<i64>,

    /// Home setpoint in tenths of a degree.
    #[serde(rename = "SETPOINT_TEMP", default)]
    pub setpoint_temp: Option<f64>,

    /// Away setpoint in tenths of a degree.
    #[serde(rename = "SETPOINT_TEMP_AWAY", default)]
    pub setpoint_temp_away: Option<f64>,
}
