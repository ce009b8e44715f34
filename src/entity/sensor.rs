// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor views of a thermostat.

use std::fmt;

use serde::Serialize;

use crate::coordinator::Coordinator;
use crate::protocol::Transport;
use crate::state::DeviceState;

use super::CELSIUS;

/// The readings exposed as sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Air temperature in °C.
    Temperature,
    /// Relative humidity in %.
    Humidity,
    /// Heating relay, `On` or `Off`.
    HeatingStatus,
    /// CO2 in ppm.
    Co2,
    /// Floor probe temperature in °C.
    FloorTemperature,
}

impl SensorKind {
    /// Label appended to `Airobot <room>` to form the display name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Temperature => "Temp",
            Self::Humidity => "Humidity",
            Self::HeatingStatus => "Heating Status",
            Self::Co2 => "CO2",
            Self::FloorTemperature => "Floor Temperature",
        }
    }

    /// Suffix of the unique id.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Temperature => "temp",
            Self::Humidity => "humidity",
            Self::HeatingStatus => "heating_status",
            Self::Co2 => "co2",
            Self::FloorTemperature => "floor_temp",
        }
    }

    /// Unit of measurement.
    #[must_use]
    pub const fn unit(&self) -> Option<&'static str> {
        match self {
            Self::Temperature | Self::FloorTemperature => Some(CELSIUS),
            Self::Humidity => Some("%"),
            Self::Co2 => Some("ppm"),
            Self::HeatingStatus => None,
        }
    }

    /// Device class understood by home automation front ends.
    #[must_use]
    pub const fn device_class(&self) -> Option<&'static str> {
        match self {
            Self::Temperature | Self::FloorTemperature => Some("temperature"),
            Self::Humidity => Some("humidity"),
            Self::Co2 => Some("carbon_dioxide"),
            Self::HeatingStatus => None,
        }
    }

    /// Extracts this sensor's reading from a state.
    #[must_use]
    pub fn read(&self, state: &DeviceState) -> Option<SensorValue> {
        match self {
            Self::Temperature => state.air_temperature().map(SensorValue::Number),
            Self::Humidity => state.humidity().map(SensorValue::Number),
            Self::Co2 => state.co2_ppm().map(SensorValue::Integer),
            Self::FloorTemperature => state.floor_temperature().map(SensorValue::Number),
            Self::HeatingStatus => Some(SensorValue::Text(if state.is_heating() {
                "On"
            } else {
                "Off"
            })),
        }
    }
}

/// A sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    /// Numeric reading.
    Number(f64),
    /// Whole-number reading.
    Integer(i64),
    /// Textual reading.
    Text(&'static str),
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One sensor of a thermostat.
pub struct ThermostatSensor<T: Transport> {
    coordinator: Coordinator<T>,
    kind: SensorKind,
    name: String,
    unique_id: String,
}

impl<T: Transport> ThermostatSensor<T> {
    /// Creates a sensor view.
    #[must_use]
    pub fn new(coordinator: Coordinator<T>, kind: SensorKind) -> Self {
        let info = coordinator.device_info();
        let name = info.entity_name(kind.label());
        let unique_id = info.unique_id(kind.key());
        Self {
            coordinator,
            kind,
            name,
            unique_id,
        }
    }

    /// Returns the sensor kind.
    #[must_use]
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unique id.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Returns the unit of measurement.
    #[must_use]
    pub fn unit(&self) -> Option<&'static str> {
        self.kind.unit()
    }

    /// Returns the device class.
    #[must_use]
    pub fn device_class(&self) -> Option<&'static str> {
        self.kind.device_class()
    }

    /// Returns the current reading.
    #[must_use]
    pub fn value(&self) -> Option<SensorValue> {
        self.coordinator
            .current_state()
            .and_then(|state| self.kind.read(&state))
    }

    /// Returns the icon, if the sensor has one.
    #[must_use]
    pub fn icon(&self) -> Option<&'static str> {
        match self.kind {
            SensorKind::HeatingStatus => Some(
                if self.value() == Some(SensorValue::Text("On")) {
                    "mdi:radiator"
                } else {
                    "mdi:radiator-off"
                },
            ),
            _ => None,
        }
    }
}

impl<T: Transport> Clone for ThermostatSensor<T> {
    fn clone(&self) -> Self {
        Self {
            coordinator: self.coordinator.clone(),
            kind: self.kind,
            name: self.name.clone(),
            unique_id: self.unique_id.clone(),
        }
    }
}

impl<T: Transport> fmt::Debug for ThermostatSensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThermostatSensor")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("unique_id", &self.unique_id)
            .finish_non_exhaustive()
    }
}

/// Builds the sensors a thermostat supports.
///
/// Temperature, humidity and heating status are always present. CO2 is
/// added only if the current state has a reading, and floor temperature
/// only if the floor probe is available. Call after the first refresh.
#[must_use]
pub fn sensors_for<T: Transport>(coordinator: &Coordinator<T>) -> Vec<ThermostatSensor<T>> {
    let mut kinds = vec![
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::HeatingStatus,
    ];

    if let Some(state) = coordinator.current_state() {
        if state.co2_ppm().is_some() {
            kinds.push(SensorKind::Co2);
        }
        if state.is_floor_temperature_available() {
            kinds.push(SensorKind::FloorTemperature);
        }
    }

    kinds
        .into_iter()
        .map(|kind| ThermostatSensor::new(coordinator.clone(), kind))
        .collect()
}
