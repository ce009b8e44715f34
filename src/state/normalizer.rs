// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of raw status and settings payloads into a [`DeviceState`].

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::types::{PresetMode, SetpointField};

use super::{DeviceState, SettingsPayload, StatusPayload};

/// CO2 value the firmware reports when no sensor is fitted.
const CO2_NO_READING: i64 = 65_535;

/// Upper bound for plausible temperatures and humidity after scaling.
const MAX_PLAUSIBLE: f64 = 100.0;

/// Builds a [`DeviceState`] from one status and one settings document.
///
/// Pure and deterministic. Raw tenths are scaled to units, sentinel and
/// out-of-range readings become `None`, and the setpoint is taken from
/// `SETPOINT_TEMP_AWAY` when `MODE` is `2` and from `SETPOINT_TEMP`
/// otherwise. A missing setpoint field reads as 0.
///
/// # Errors
///
/// Returns [`ParseError::Validation`] if a document is not an object or a
/// field has the wrong type.
pub fn normalize(status: &Value, settings: &Value) -> Result<DeviceState, ParseError> {
    let status = StatusPayload::deserialize(status)
        .map_err(|e| ParseError::validation("status", e.to_string()))?;
    let settings = SettingsPayload::deserialize(settings)
        .map_err(|e| ParseError::validation("settings", e.to_string()))?;

    let preset_mode = PresetMode::from_raw(settings.mode.unwrap_or(1));
    let setpoint_field = preset_mode.setpoint_field();
    let raw_setpoint = match setpoint_field {
        SetpointField::Home => settings.setpoint_temp,
        SetpointField::Away => settings.setpoint_temp_away,
    }
    .unwrap_or(0.0);

    let co2_ppm = status.co2.filter(|raw| *raw != CO2_NO_READING);

    let humidity = status.hum_air.map(scale).filter(|h| *h <= MAX_PLAUSIBLE);
    let air_temperature = status.temp_air.map(scale).filter(|t| *t <= MAX_PLAUSIBLE);
    let floor_temperature = status
        .temp_floor
        .map(scale)
        .filter(|t| *t > 0.0 && *t < MAX_PLAUSIBLE);

    Ok(DeviceState {
        air_temperature,
        floor_temperature,
        floor_temperature_available: floor_temperature.is_some(),
        humidity,
        co2_ppm,
        air_quality_index: status.aqi.unwrap_or(0),
        setpoint_temperature: scale(raw_setpoint),
        preset_mode,
        heating_active: status.heating_on(),
    })
}

fn scale(tenths: f64) -> f64 {
    tenths / 10.0
}
