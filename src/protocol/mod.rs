// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport to the thermostat's local REST API.
//!
//! # Transports
//!
//! - [`HttpClient`]: authenticated HTTP requests via `reqwest`
//!
//! Anything implementing [`Transport`] can drive a
//! [`Coordinator`](crate::coordinator::Coordinator), which keeps the
//! refresh logic independent from how bytes reach the device.

mod http;

pub use http::{ApiPaths, HttpClient, HttpConfig};

use std::future::Future;

use serde_json::Value;

use crate::error::Error;
use crate::types::{SetpointField, Tenths};

/// Requests the coordinator needs from the device.
///
/// Implementations hold no state between calls and never retry: each
/// method issues exactly one request.
pub trait Transport: Send + Sync + 'static {
    /// Fetches the status document (live readings).
    ///
    /// # Errors
    ///
    /// Returns a network, upstream-status, or decode error.
    fn fetch_status(&self) -> impl Future<Output = Result<Value, Error>> + Send;

    /// Fetches the settings document (preset and setpoints).
    ///
    /// # Errors
    ///
    /// Returns a network, upstream-status, or decode error.
    fn fetch_settings(&self) -> impl Future<Output = Result<Value, Error>> + Send;

    /// Writes a single setpoint field.
    ///
    /// # Errors
    ///
    /// Returns a network or upstream-status error. The latter carries the
    /// response body.
    fn push_setting(
        &self,
        field: SetpointField,
        value: Tenths,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}
