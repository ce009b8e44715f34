// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for Airobot thermostats.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};

use crate::error::{Error, ParseError, ProtocolError};
use crate::protocol::Transport;
use crate::types::{SetpointField, Tenths};

// ============================================================================
// ApiPaths - Endpoint paths on the device
// ============================================================================

/// Endpoint paths of the thermostat's local API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ApiPaths {
    /// Path of the status document (GET).
    pub status: String,
    /// Path of the settings document (GET).
    pub get_settings: String,
    /// Path that accepts settings writes (POST).
    pub set_settings: String,
}

impl Default for ApiPaths {
    fn default() -> Self {
        Self {
            status: "/api/thermostat/getStatuses".to_string(),
            get_settings: "/api/thermostat/getSettings".to_string(),
            set_settings: "/api/thermostat/setSettings".to_string(),
        }
    }
}

// ============================================================================
// HttpConfig - Connection parameters
// ============================================================================

/// Configuration for the HTTP transport.
///
/// The thermostat uses its device id as the Basic-auth username, so
/// credentials are mandatory.
///
/// # Examples
///
/// ```
/// use airobot_lib::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("192.168.1.40", "T0012AB", "secret")
///     .with_port(8080)
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "http://192.168.1.40:8080");
/// ```
#[derive(Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    use_https: bool,
    username: String,
    password: String,
    timeout: Duration,
    paths: ApiPaths,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default HTTPS port.
    pub const DEFAULT_HTTPS_PORT: u16 = 443;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given host and credentials.
    ///
    /// `host` may also be a full base URL such as `http://10.0.0.5:8080`,
    /// in which case port and scheme settings are ignored.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            use_https: false,
            username: username.into(),
            password: password.into(),
            timeout: Self::DEFAULT_TIMEOUT,
            paths: ApiPaths::default(),
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables HTTPS.
    ///
    /// If port hasn't been explicitly set, it will be changed to 443.
    #[must_use]
    pub fn with_https(mut self) -> Self {
        self.use_https = true;
        if self.port == Self::DEFAULT_PORT {
            self.port = Self::DEFAULT_HTTPS_PORT;
        }
        self
    }

    /// Sets the request timeout.
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

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the username (the device id).
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the endpoint paths.
    #[must_use]
    pub fn paths(&self) -> &ApiPaths {
        &self.paths
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.host.contains("://") {
            return self.host.trim_end_matches('/').to_string();
        }
        let scheme = if self.use_https { "https" } else { "http" };
        let port_suffix =
            if (self.use_https && self.port == 443) || (!self.use_https && self.port == 80) {
                String::new()
            } else {
                format!(":{}", self.port)
            };
        format!("{scheme}://{}{port_suffix}", self.host)
    }

    /// Creates an [`HttpClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty, the credentials cannot be
    /// encoded into a header, or the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }
        let base_url = self.base_url();

        let mut auth = HeaderValue::from_str(&basic_auth_value(&self.username, &self.password))
            .map_err(|e| ProtocolError::InvalidAddress(format!("credentials: {e}")))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()
            .map_err(ProtocolError::from)?;

        Ok(HttpClient {
            base_url,
            client,
            device_id: self.username,
            paths: self.paths,
        })
    }
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_https", &self.use_https)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("paths", &self.paths)
            .finish()
    }
}

fn basic_auth_value(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

// ============================================================================
// HttpClient - Transport implementation
// ============================================================================

/// HTTP client for one thermostat.
///
/// Every request carries `Authorization: Basic base64(username:password)`.
/// Reads are `GET`s of the status and settings documents; writes are a
/// `POST` of `{"DEVICE_ID": <username>, <field>: <tenths>}`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    device_id: String,
    paths: ApiPaths,
}

impl HttpClient {
    /// Returns the base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the device id sent with every write.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns the `Authorization` header value for the given credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use airobot_lib::protocol::HttpClient;
    ///
    /// assert_eq!(HttpClient::basic_auth("user", "pass"), "Basic dXNlcjpwYXNz");
    /// ```
    #[must_use]
    pub fn basic_auth(username: &str, password: &str) -> String {
        basic_auth_value(username, password)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Builds the JSON body of a setpoint write.
    #[must_use]
    pub fn setting_body(&self, field: SetpointField, value: Tenths) -> Value {
        let mut body = Map::new();
        body.insert("DEVICE_ID".to_string(), Value::from(self.device_id.as_str()));
        body.insert(field.as_str().to_string(), Value::from(value.value()));
        Value::Object(body)
    }

    async fn get_json(&self, path: &str) -> Result<Value, Error> {
        let url = self.url(path);

        tracing::debug!(url = %url, "Fetching thermostat document");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProtocolError::from)?;

        if response.status() != StatusCode::OK {
            return Err(ProtocolError::UpstreamStatus {
                status: response.status().as_u16(),
                body: String::new(),
            }
            .into());
        }

        let body = response.text().await.map_err(ProtocolError::from)?;

        tracing::debug!(url = %url, body = %body, "Received thermostat document");

        serde_json::from_str(&body)
            .map_err(ParseError::from)
            .map_err(Error::from)
    }
}

impl Transport for HttpClient {
    async fn fetch_status(&self) -> Result<Value, Error> {
        self.get_json(&self.paths.status).await
    }

    async fn fetch_settings(&self) -> Result<Value, Error> {
        self.get_json(&self.paths.get_settings).await
    }

    async fn push_setting(&self, field: SetpointField, value: Tenths) -> Result<(), Error> {
        let url = self.url(&self.paths.set_settings);
        let body = self.setting_body(field, value);

        tracing::debug!(url = %url, payload = %body, "Posting thermostat setting");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ProtocolError::from)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ProtocolError::UpstreamStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(())
    }
}
