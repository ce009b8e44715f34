// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Airobot Lib - A Rust library to poll and control Airobot room thermostats.
//!
//! Airobot thermostats expose a small REST API on the local network,
//! protected by HTTP Basic authentication with the device id as username.
//! This library polls it on a fixed interval and keeps a normalized,
//! immutable snapshot of the thermostat.
//!
//! # Supported Features
//!
//! - **Readings**: Air and floor temperature, humidity, CO2, air quality index
//! - **Heating status**: Whether the heating relay is on
//! - **Setpoints**: Read the active preset's target, write a new one
//! - **Subscriptions**: Callbacks after every successful or failed refresh
//! - **Entity views**: Climate and sensor adapters for home automation
//!
//! # Quick Start
//!
//! ```no_run
//! use airobot_lib::{Coordinator, ThermostatConfig};
//!
//! #[tokio::main]
//! async fn main() -> airobot_lib::Result<()> {
//!     let config = ThermostatConfig::new("192.168.1.40", "T0012AB", "secret")
//!         .with_room("Living Room");
//!     let coordinator = Coordinator::from_config(&config)?;
//!
//!     // First refresh, then every 15 seconds
//!     let poller = coordinator.start(config.poll_interval()).await?;
//!
//!     if let Some(state) = coordinator.current_state() {
//!         println!("{:?} °C, target {} °C", state.air_temperature(), state.setpoint_temperature());
//!     }
//!
//!     coordinator.set_temperature(21.5).await?;
//!
//!     poller.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Subscriptions
//!
//! ```no_run
//! use airobot_lib::{Coordinator, ThermostatConfig, subscription::Subscribable};
//!
//! #[tokio::main]
//! async fn main() -> airobot_lib::Result<()> {
//!     let config = ThermostatConfig::new("192.168.1.40", "T0012AB", "secret");
//!     let coordinator = Coordinator::from_config(&config)?;
//!
//!     coordinator.on_state_updated(|state| {
//!         println!("Heating: {}", state.is_heating());
//!     });
//!     coordinator.on_update_failed(|error| {
//!         eprintln!("Refresh failed ({:?}): {error}", error.kind());
//!     });
//!
//!     let _poller = coordinator.start(config.poll_interval()).await?;
//!     tokio::time::sleep(std::time::Duration::from_secs(60)).await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod types;

pub use config::{DeviceInfo, ThermostatConfig};
pub use coordinator::{Coordinator, CoordinatorStatus, PollHandle, RefreshOutcome};
pub use entity::{SensorKind, SensorValue, ThermostatClimate, ThermostatSensor};
pub use error::{DeviceError, Error, ErrorKind, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{ApiPaths, HttpClient, HttpConfig, Transport};
pub use state::{DeviceState, normalize};
pub use subscription::{CallbackRegistry, RefreshEvent, Subscribable, SubscriptionId};
pub use types::{PresetMode, SetpointField, Tenths};
