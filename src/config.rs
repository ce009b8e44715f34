// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat configuration.
//!
//! A [`ThermostatConfig`] holds everything needed to reach one thermostat
//! and label it: address, credentials, room name, poll interval, timeout,
//! and API paths. It can be built in code or deserialized with `serde`.
//!
//! # Examples
//!
//! ```
//! use airobot_lib::ThermostatConfig;
//! use std::time::Duration;
//!
//! let config: ThermostatConfig = serde_json::from_str(r#"{
//!     "host": "192.168.1.40",
//!     "username": "T0012AB",
//!     "password": "secret",
//!     "room": "Kitchen",
//!     "poll_interval_secs": 30
//! }"#)?;
//!
//! assert_eq!(config.room(), "Kitchen");
//! assert_eq!(config.poll_interval(), Duration::from_secs(30));
//! assert_eq!(config.timeout(), Duration::from_secs(10));
//! config.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::{DeviceError, ParseError};
use crate::protocol::{ApiPaths, HttpConfig};

/// Default interval between refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for one thermostat.
#[derive(Clone, Deserialize)]
pub struct ThermostatConfig {
    host: String,
    username: String,
    password: String,
    #[serde(default)]
    room: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    use_https: bool,
    #[serde(
        rename = "poll_interval_secs",
        default = "default_poll_interval",
        deserialize_with = "duration_from_secs"
    )]
    poll_interval: Duration,
    #[serde(
        rename = "timeout_secs",
        default = "default_timeout",
        deserialize_with = "duration_from_secs"
    )]
    timeout: Duration,
    #[serde(default)]
    paths: ApiPaths,
}

fn default_port() -> u16 {
    HttpConfig::DEFAULT_PORT
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

impl ThermostatConfig {
    /// Creates a configuration with default port, interval, timeout and paths.
    ///
    /// The username is the thermostat's device id.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            room: String::new(),
            port: HttpConfig::DEFAULT_PORT,
            use_https: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            paths: ApiPaths::default(),
        }
    }

    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Decode`] if the document is malformed or
    /// misses a required field.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json).map_err(ParseError::from)
    }

    /// Sets the room label used in names and unique ids.
    #[must_use]
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables HTTPS.
    #[must_use]
    pub fn with_https(mut self) -> Self {
        self.use_https = true;
        self
    }

    /// Sets the refresh interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the endpoint paths.
    #[must_use]
    pub fn with_paths(mut self, paths: ApiPaths) -> Self {
        self.paths = paths;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the username (the device id).
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the room label.
    #[must_use]
    pub fn room(&self) -> &str {
        &self.room
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the refresh interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the endpoint paths.
    #[must_use]
    pub fn paths(&self) -> &ApiPaths {
        &self.paths
    }

    /// Returns the identity used for names and unique ids.
    #[must_use]
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo::new(self.username.clone(), self.room.clone())
    }

    /// Checks the configuration for values that can never work.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidConfiguration`] if the host or username
    /// is empty, or if the poll interval or timeout is zero.
    pub fn validate(&self) -> Result<(), DeviceError> {
        if self.host.trim().is_empty() {
            return Err(DeviceError::InvalidConfiguration(
                "host must not be empty".to_string(),
            ));
        }
        if self.username.trim().is_empty() {
            return Err(DeviceError::InvalidConfiguration(
                "username must not be empty".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(DeviceError::InvalidConfiguration(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(DeviceError::InvalidConfiguration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the transport configuration.
    #[must_use]
    pub fn to_http_config(&self) -> HttpConfig {
        let config = HttpConfig::new(&self.host, &self.username, &self.password)
            .with_port(self.port)
            .with_timeout(self.timeout)
            .with_paths(self.paths.clone());
        if self.use_https {
            config.with_https()
        } else {
            config
        }
    }
}

impl fmt::Debug for ThermostatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThermostatConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("room", &self.room)
            .field("port", &self.port)
            .field("use_https", &self.use_https)
            .field("poll_interval", &self.poll_interval)
            .field("timeout", &self.timeout)
            .field("paths", &self.paths)
            .finish()
    }
}

/// Identity of one thermostat: its device id and room label.
///
/// Display names and unique ids of the coordinator and entities derive
/// from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DeviceInfo {
    device_id: String,
    room: String,
}

impl DeviceInfo {
    /// Creates a device identity.
    #[must_use]
    pub fn new(device_id: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            room: room.into(),
        }
    }

    /// Returns the device id (the API username).
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns the room label.
    #[must_use]
    pub fn room(&self) -> &str {
        &self.room
    }

    /// Returns the coordinator name, `Airobot Thermostat <room>`.
    #[must_use]
    pub fn coordinator_name(&self) -> String {
        format!("Airobot Thermostat {}", self.room)
    }

    /// Returns a unique id of the form `airobot_thermostat_<id>_<room>_<suffix>`.
    #[must_use]
    pub fn unique_id(&self, suffix: &str) -> String {
        format!(
            "airobot_thermostat_{}_{}_{suffix}",
            self.device_id, self.room
        )
    }

    /// Returns an entity name of the form `Airobot <room> <label>`.
    #[must_use]
    pub fn entity_name(&self, label: &str) -> String {
        format!("Airobot {} {label}", self.room)
    }
}
