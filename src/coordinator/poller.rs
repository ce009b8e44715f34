// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed-interval refresh scheduler.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::protocol::Transport;

use super::Coordinator;

/// Handle to the background task refreshing a coordinator.
///
/// Ticks that fire while a refresh is still running are skipped, never
/// queued. Dropping the handle aborts the task; an abandoned refresh
/// leaves the cached state as it was.
#[derive(Debug)]
pub struct PollHandle {
    interval: Duration,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub(super) fn spawn<T: Transport>(coordinator: Coordinator<T>, interval: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(
                coordinator = %coordinator.name(),
                interval = ?interval,
                "Started polling"
            );

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        // Failures are recorded and dispatched by the coordinator.
                        let _ = coordinator.refresh().await;
                    }
                }
            }

            tracing::info!(coordinator = %coordinator.name(), "Stopped polling");
        });

        Self {
            interval,
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    /// Returns the refresh interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` while the background task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the timer and waits for an in-flight refresh to complete.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::warn!(error = %e, "Polling task ended abnormally");
        }
    }

    /// Stops the timer immediately, abandoning an in-flight refresh.
    pub fn abort(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
