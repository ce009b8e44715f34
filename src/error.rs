// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `airobot_lib` library.
//!
//! Failures fall into four recoverable families: the device could not be
//! reached ([`ProtocolError::Network`]), it answered with a non-200 status
//! ([`ProtocolError::UpstreamStatus`]), the body was not JSON
//! ([`ParseError::Decode`]), or the JSON could not be turned into a
//! [`DeviceState`](crate::state::DeviceState) ([`ParseError::Validation`]).
//! Use [`Error::kind`] to branch on the family without matching nested enums.
//!
//! All error types are `Clone`: a refresh failure is handed to the caller,
//! kept as the coordinator's last error, and dispatched to observers.

use std::sync::Arc;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A caller-supplied value was rejected before reaching the device.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the thermostat.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while decoding or validating a payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during device operations.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connection, DNS or timeout failure.
    Network,
    /// The device answered with a non-200 status.
    UpstreamStatus,
    /// The response body was not valid JSON.
    Decode,
    /// The JSON was well-formed but semantically unusable.
    Validation,
    /// A caller-supplied value was out of range.
    Value,
    /// Unsupported operation or invalid configuration.
    Device,
}

impl Error {
    /// Returns the failure family this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Value(_) => ErrorKind::Value,
            Self::Protocol(ProtocolError::Network(_) | ProtocolError::InvalidAddress(_)) => {
                ErrorKind::Network
            }
            Self::Protocol(ProtocolError::UpstreamStatus { .. }) => ErrorKind::UpstreamStatus,
            Self::Parse(ParseError::Decode(_)) => ErrorKind::Decode,
            Self::Parse(ParseError::Validation { .. }) => ErrorKind::Validation,
            Self::Device(_) => ErrorKind::Device,
        }
    }

    /// Returns the HTTP status code if the device rejected the request.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Protocol(ProtocolError::UpstreamStatus { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A target temperature is not finite or lies outside the device range.
    #[error("temperature {actual} is out of range [{min}, {max}]")]
    InvalidTemperature {
        /// Minimum accepted value in degrees Celsius.
        min: f64,
        /// Maximum accepted value in degrees Celsius.
        max: f64,
        /// The value that was provided.
        actual: f64,
    },

    /// An unknown preset mode name was provided.
    #[error("invalid preset mode: {0}")]
    InvalidPresetMode(String),
}

/// Errors related to HTTP communication with the thermostat.
#[derive(Debug, Clone, Error)]
pub enum ProtocolError {
    /// Connection, DNS, or timeout failure.
    #[error("network error: {0}")]
    Network(#[source] Arc<reqwest::Error>),

    /// The device answered with a non-200 status code.
    #[error("device returned HTTP {status}")]
    UpstreamStatus {
        /// The HTTP status code.
        status: u16,
        /// The response body, empty for read requests.
        body: String,
    },

    /// Invalid URL, host, or header value.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl ProtocolError {
    /// Returns `true` if the underlying request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout())
    }
}

impl From<reqwest::Error> for ProtocolError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(Arc::new(e))
    }
}

/// Errors related to decoding thermostat payloads.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// The body is not valid JSON.
    #[error("JSON decode error: {0}")]
    Decode(#[source] Arc<serde_json::Error>),

    /// A field has a type or value that cannot be interpreted.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The offending payload field, or the payload name.
        field: String,
        /// Description of the failure.
        message: String,
    },
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(Arc::new(e))
    }
}

impl ParseError {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors related to device operations.
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    /// The requested operation is not supported by this integration.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Device configuration is invalid.
    #[error("invalid device configuration: {0}")]
    InvalidConfiguration(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
