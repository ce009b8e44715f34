// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate view of a thermostat.

use std::fmt;

use serde::Serialize;

use crate::coordinator::Coordinator;
use crate::error::{DeviceError, Result};
use crate::protocol::Transport;
use crate::types::PresetMode;

use super::CELSIUS;

/// HVAC operating mode. The thermostat only heats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HvacMode {
    /// Heating.
    Heat,
}

impl HvacMode {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Heat => "heat",
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the thermostat is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HvacAction {
    /// The heating relay is on.
    Heating,
    /// The heating relay is off.
    Idle,
}

impl HvacAction {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Heating => "heating",
            Self::Idle => "idle",
        }
    }
}

impl fmt::Display for HvacAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra readings exposed next to the climate state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateAttributes {
    /// CO2 in ppm, if the device has a sensor.
    pub co2: Option<i64>,
    /// Air quality index.
    pub aqi: i64,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
}

/// Climate control view over a coordinator.
///
/// # Examples
///
/// ```no_run
/// use airobot_lib::{Coordinator, ThermostatConfig};
/// use airobot_lib::entity::ThermostatClimate;
///
/// # async fn example() -> airobot_lib::Result<()> {
/// let config = ThermostatConfig::new("192.168.1.40", "T0012AB", "secret")
///     .with_room("Bedroom");
/// let coordinator = Coordinator::from_config(&config)?;
/// coordinator.refresh().await?;
///
/// let climate = ThermostatClimate::new(coordinator);
/// println!("{}: {:?} °C", climate.name(), climate.current_temperature());
/// climate.set_temperature(Some(20.5)).await?;
/// # Ok(())
/// # }
/// ```
pub struct ThermostatClimate<T: Transport> {
    coordinator: Coordinator<T>,
    name: String,
    unique_id: String,
}

impl<T: Transport> Clone for ThermostatClimate<T> {
    fn clone(&self) -> Self {
        Self {
            coordinator: self.coordinator.clone(),
            name: self.name.clone(),
            unique_id: self.unique_id.clone(),
        }
    }
}

impl<T: Transport> fmt::Debug for ThermostatClimate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThermostatClimate")
            .field("name", &self.name)
            .field("unique_id", &self.unique_id)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> ThermostatClimate<T> {
    /// Creates the climate view.
    #[must_use]
    pub fn new(coordinator: Coordinator<T>) -> Self {
        let info = coordinator.device_info();
        let name = info.entity_name("Thermostat");
        let unique_id = info.unique_id("climate");
        Self {
            coordinator,
            name,
            unique_id,
        }
    }

    /// Returns the display name, `Airobot <room> Thermostat`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unique id.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Returns the backing coordinator.
    #[must_use]
    pub fn coordinator(&self) -> &Coordinator<T> {
        &self.coordinator
    }

    /// Returns `true` if the last refresh succeeded.
    #[must_use]
    pub fn available(&self) -> bool {
        self.coordinator.last_update_success()
    }

    /// Returns the temperature unit.
    #[must_use]
    pub fn temperature_unit(&self) -> &'static str {
        CELSIUS
    }

    /// Returns the supported HVAC modes.
    #[must_use]
    pub fn hvac_modes(&self) -> &'static [HvacMode] {
        &[HvacMode::Heat]
    }

    /// Returns the HVAC mode.
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        HvacMode::Heat
    }

    /// Returns the supported presets.
    #[must_use]
    pub fn preset_modes(&self) -> &'static [PresetMode] {
        &PresetMode::ALL
    }

    /// Returns the HVAC action.
    #[must_use]
    pub fn hvac_action(&self) -> Option<HvacAction> {
        self.coordinator.current_state().map(|state| {
            if state.is_heating() {
                HvacAction::Heating
            } else {
                HvacAction::Idle
            }
        })
    }

    /// Returns the active preset.
    #[must_use]
    pub fn preset_mode(&self) -> Option<PresetMode> {
        self.coordinator
            .current_state()
            .map(|state| state.preset_mode())
    }

    /// Returns the air temperature.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f64> {
        self.coordinator
            .current_state()
            .and_then(|state| state.air_temperature())
    }

    /// Returns the setpoint of the active preset.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.coordinator
            .current_state()
            .map(|state| state.setpoint_temperature())
    }

    /// Returns CO2, AQI and humidity.
    #[must_use]
    pub fn extra_attributes(&self) -> Option<ClimateAttributes> {
        self.coordinator
            .current_state()
            .map(|state| ClimateAttributes {
                co2: state.co2_ppm(),
                aqi: state.air_quality_index(),
                humidity: state.humidity(),
            })
    }

    /// Writes a new target temperature for the active preset.
    ///
    /// A missing value is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns the error of [`Coordinator::set_temperature`].
    pub async fn set_temperature(&self, celsius: Option<f64>) -> Result<()> {
        let Some(celsius) = celsius else {
            tracing::error!(entity = %self.unique_id, "No target temperature provided");
            return Ok(());
        };
        self.coordinator.set_temperature(celsius).await
    }

    /// Changes the active preset.
    ///
    /// Preset writes are not supported by this integration. Known preset
    /// names are rejected with an unsupported-operation error.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidPresetMode`](crate::ValueError) for an
    /// unknown name and [`DeviceError::UnsupportedOperation`] otherwise.
    #[allow(clippy::unused_async)]
    pub async fn set_preset_mode(&self, preset: &str) -> Result<()> {
        let preset: PresetMode = preset.parse()?;
        tracing::warn!(entity = %self.unique_id, preset = %preset, "Preset writes are not supported");
        Err(DeviceError::UnsupportedOperation(format!("set preset mode to {preset}")).into())
    }
}
