// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical device state.

use serde::Serialize;

use crate::types::{PresetMode, SetpointField};

/// Normalized snapshot of one thermostat, produced by a single refresh.
///
/// All readings are in degrees Celsius, percent, or ppm. Readings the
/// device reports as invalid are `None`, never a sentinel number. A new
/// snapshot replaces the previous one as a whole; there are no setters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceState {
    pub(super) air_temperature: Option<f64>,
    pub(super) floor_temperature: Option<f64>,
    pub(super) floor_temperature_available: bool,
    pub(super) humidity: Option<f64>,
    pub(super) co2_ppm: Option<i64>,
    pub(super) air_quality_index: i64,
    pub(super) setpoint_temperature: f64,
    pub(super) preset_mode: PresetMode,
    pub(super) heating_active: bool,
}

impl DeviceState {
    /// Room air temperature.
    #[must_use]
    pub fn air_temperature(&self) -> Option<f64> {
        self.air_temperature
    }

    /// Floor probe temperature, if a probe is fitted and reading.
    #[must_use]
    pub fn floor_temperature(&self) -> Option<f64> {
        self.floor_temperature
    }

    /// Returns `true` if the floor probe reported a plausible value.
    #[must_use]
    pub fn is_floor_temperature_available(&self) -> bool {
        self.floor_temperature_available
    }

    /// Relative humidity in percent.
    #[must_use]
    pub fn humidity(&self) -> Option<f64> {
        self.humidity
    }

    /// CO2 concentration, `None` on models without the sensor.
    ///
    /// Any value other than the no-sensor sentinel is passed through as
    /// reported, including negative ones.
    #[must_use]
    pub fn co2_ppm(&self) -> Option<i64> {
        self.co2_ppm
    }

    /// Air quality index as reported by the device.
    #[must_use]
    pub fn air_quality_index(&self) -> i64 {
        self.air_quality_index
    }

    /// Setpoint of the active preset.
    #[must_use]
    pub fn setpoint_temperature(&self) -> f64 {
        self.setpoint_temperature
    }

    /// Active preset mode.
    #[must_use]
    pub fn preset_mode(&self) -> PresetMode {
        self.preset_mode
    }

    /// Settings field a setpoint write must target for the active preset.
    #[must_use]
    pub fn setpoint_field(&self) -> SetpointField {
        self.preset_mode.setpoint_field()
    }

    /// Returns `true` while the heating output is on.
    #[must_use]
    pub fn is_heating(&self) -> bool {
        self.heating_active
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::state::normalize;
    use crate::types::{PresetMode, SetpointField};

    #[test]
    fn setpoint_field_follows_preset() {
        let status = json!({});
        let away = normalize(&status, &json!({"MODE": 2, "SETPOINT_TEMP_AWAY": 160})).unwrap();
        assert_eq!(away.preset_mode(), PresetMode::Away);
        assert_eq!(away.setpoint_field(), SetpointField::Away);

        let home = normalize(&status, &json!({"SETPOINT_TEMP": 200})).unwrap();
        assert_eq!(home.setpoint_field(), SetpointField::Home);
    }

    #[test]
    fn serializes_absent_readings_as_null() {
        let state = normalize(
            &json!({"CO2": 65535, "TEMP_AIR": 212}),
            &json!({"SETPOINT_TEMP": 210}),
        )
        .unwrap();
        let value = serde_json::to_value(&state).unwrap();
        assert!(value["co2_ppm"].is_null());
        assert_eq!(value["air_temperature"], json!(21.2));
        assert_eq!(value["preset_mode"], json!("Home"));
    }
}
