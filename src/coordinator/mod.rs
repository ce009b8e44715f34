// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poll coordinator for one thermostat.
//!
//! The [`Coordinator`] owns a [`Transport`], fetches the status and
//! settings documents on every refresh, normalizes them into a
//! [`DeviceState`], and swaps the cached state in one step. Readers always
//! see either the previous or the new snapshot, never a mix. A failed
//! refresh keeps the previous state and is reported to observers.
//!
//! Refreshes never overlap: a refresh requested while another one is in
//! flight returns [`RefreshOutcome::Skipped`] immediately.
//!
//! # Examples
//!
//! ```no_run
//! use airobot_lib::{Coordinator, ThermostatConfig};
//!
//! # async fn example() -> airobot_lib::Result<()> {
//! let config = ThermostatConfig::new("192.168.1.40", "T0012AB", "secret")
//!     .with_room("Kitchen");
//! let coordinator = Coordinator::from_config(&config)?;
//!
//! // The first refresh must succeed before polling starts.
//! let poller = coordinator.start(config.poll_interval()).await?;
//!
//! coordinator.set_temperature(21.5).await?;
//!
//! poller.stop().await;
//! # Ok(())
//! # }
//! ```

mod poller;
mod status;

pub use poller::PollHandle;
pub use status::{CoordinatorStatus, RefreshOutcome};

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::config::{DeviceInfo, ThermostatConfig};
use crate::error::{DeviceError, Error, Result};
use crate::protocol::{HttpClient, Transport};
use crate::state::{DeviceState, normalize};
use crate::subscription::{
    CallbackRegistry, RefreshEvent, StateListener, Subscribable, SubscriptionId,
};
use crate::types::{PresetMode, Tenths};

/// Bookkeeping updated once per completed refresh.
#[derive(Debug, Default)]
struct Record {
    state: Option<Arc<DeviceState>>,
    last_error: Option<Error>,
    last_updated_at: Option<DateTime<Utc>>,
    attempted: bool,
}

struct Inner<T> {
    info: DeviceInfo,
    name: String,
    transport: T,
    record: RwLock<Record>,
    refreshing: AtomicBool,
    callbacks: CallbackRegistry,
}

/// Clears the in-flight flag when a refresh ends or is abandoned.
struct RefreshGuard<'a>(&'a AtomicBool);

impl<'a> RefreshGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Poll coordinator holding the latest [`DeviceState`] of one thermostat.
///
/// Cloning is cheap and every clone shares the same state, bookkeeping and
/// subscriptions.
pub struct Coordinator<T: Transport> {
    inner: Arc<Inner<T>>,
}

impl<T: Transport> Clone for Coordinator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Coordinator<HttpClient> {
    /// Creates a coordinator talking HTTP to the configured thermostat.
    ///
    /// No request is made until [`refresh`](Self::refresh) or
    /// [`start`](Self::start) is called.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &ThermostatConfig) -> Result<Self> {
        config.validate()?;
        let client = config.to_http_config().into_client()?;
        Ok(Self::new(client, config.device_info()))
    }
}

impl<T: Transport> Coordinator<T> {
    /// Creates a coordinator over an arbitrary transport.
    #[must_use]
    pub fn new(transport: T, info: DeviceInfo) -> Self {
        let name = info.coordinator_name();
        Self {
            inner: Arc::new(Inner {
                info,
                name,
                transport,
                record: RwLock::new(Record::default()),
                refreshing: AtomicBool::new(false),
                callbacks: CallbackRegistry::new(),
            }),
        }
    }

    /// Returns the coordinator name, `Airobot Thermostat <room>`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the device identity.
    #[must_use]
    pub fn device_info(&self) -> &DeviceInfo {
        &self.inner.info
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Returns the latest state, or `None` before the first successful refresh.
    #[must_use]
    pub fn current_state(&self) -> Option<Arc<DeviceState>> {
        self.inner.record.read().state.clone()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> CoordinatorStatus {
        if self.inner.refreshing.load(Ordering::Acquire) {
            return CoordinatorStatus::Refreshing;
        }
        let record = self.inner.record.read();
        if !record.attempted {
            CoordinatorStatus::Idle
        } else if record.last_error.is_some() {
            CoordinatorStatus::Failed
        } else {
            CoordinatorStatus::Ready
        }
    }

    /// Returns `true` if the last completed refresh succeeded.
    #[must_use]
    pub fn last_update_success(&self) -> bool {
        let record = self.inner.record.read();
        record.attempted && record.last_error.is_none()
    }

    /// Returns the error of the last refresh, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<Error> {
        self.inner.record.read().last_error.clone()
    }

    /// Returns when the state was last replaced.
    #[must_use]
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.inner.record.read().last_updated_at
    }

    /// Runs one refresh cycle.
    ///
    /// Fetches status, then settings, normalizes them, and replaces the
    /// cached state. On failure the cached state is kept and the error is
    /// recorded. Either way observers are notified once the cycle is done.
    ///
    /// # Errors
    ///
    /// Returns the network, upstream-status, decode or validation error that
    /// aborted the cycle.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let Some(guard) = RefreshGuard::acquire(&self.inner.refreshing) else {
            tracing::trace!(coordinator = %self.inner.name, "Refresh already in flight, skipping");
            return Ok(RefreshOutcome::Skipped);
        };

        let result = self.fetch_state().await;

        let (event, outcome) = {
            let mut record = self.inner.record.write();
            record.attempted = true;
            match result {
                Ok(state) => {
                    let state = Arc::new(state);
                    record.state = Some(Arc::clone(&state));
                    record.last_error = None;
                    record.last_updated_at = Some(Utc::now());
                    (
                        RefreshEvent::Updated(Arc::clone(&state)),
                        Ok(RefreshOutcome::Updated(state)),
                    )
                }
                Err(error) => {
                    record.last_error = Some(error.clone());
                    (
                        RefreshEvent::Failed {
                            error: Arc::new(error.clone()),
                            last_state: record.state.clone(),
                        },
                        Err(error),
                    )
                }
            }
        };
        drop(guard);

        match &outcome {
            Ok(_) => tracing::debug!(coordinator = %self.inner.name, "Refreshed thermostat state"),
            Err(e) => tracing::warn!(
                coordinator = %self.inner.name,
                kind = ?e.kind(),
                error = %e,
                "Failed to refresh thermostat state"
            ),
        }

        self.inner.callbacks.dispatch(&event);
        outcome
    }

    async fn fetch_state(&self) -> Result<DeviceState> {
        let status = self.inner.transport.fetch_status().await?;
        let settings = self.inner.transport.fetch_settings().await?;
        Ok(normalize(&status, &settings)?)
    }

    /// Writes a new target temperature for the active preset.
    ///
    /// The value is sent in tenths of a degree to `SETPOINT_TEMP` while the
    /// preset is Home and to `SETPOINT_TEMP_AWAY` while it is Away. Before
    /// the first successful refresh the Home field is used. The cached
    /// state is not touched; the next refresh picks up the new setpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTemperature`](crate::ValueError) for a
    /// non-finite or out-of-range value, or the transport error if the
    /// device rejects the write.
    pub async fn set_temperature(&self, celsius: f64) -> Result<()> {
        let tenths = Tenths::from_celsius(celsius)?;
        let preset = self
            .current_state()
            .map_or(PresetMode::Home, |state| state.preset_mode());
        let field = preset.setpoint_field();

        match self.inner.transport.push_setting(field, tenths).await {
            Ok(()) => {
                tracing::info!(
                    coordinator = %self.inner.name,
                    field = %field,
                    celsius,
                    "Target temperature set"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    coordinator = %self.inner.name,
                    field = %field,
                    status = ?e.upstream_status(),
                    error = %e,
                    "Failed to set target temperature"
                );
                Err(e)
            }
        }
    }

    /// Performs a first refresh and then polls at a fixed interval.
    ///
    /// Returns once the first refresh has completed. Later failures are
    /// recorded and dispatched without stopping the timer.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidConfiguration`] for a zero interval, or
    /// the error of the first refresh; no timer is started in that case.
    pub async fn start(&self, interval: Duration) -> Result<PollHandle> {
        if interval.is_zero() {
            return Err(DeviceError::InvalidConfiguration(
                "poll interval must be greater than zero".to_string(),
            )
            .into());
        }

        self.refresh().await?;
        Ok(PollHandle::spawn(self.clone(), interval))
    }
}

impl<T: Transport> Subscribable for Coordinator<T> {
    fn on_refresh<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RefreshEvent) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_refresh(callback)
    }

    fn on_state_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_state_updated(callback)
    }

    fn on_update_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_update_failed(callback)
    }

    fn subscribe(&self, listener: Arc<dyn StateListener>) -> SubscriptionId {
        self.inner.callbacks.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.callbacks.unsubscribe(id)
    }
}

impl<T: Transport> fmt::Debug for Coordinator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("name", &self.inner.name)
            .field("status", &self.status())
            .field("callbacks", &self.inner.callbacks)
            .finish_non_exhaustive()
    }
}
