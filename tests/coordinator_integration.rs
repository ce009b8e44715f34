// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the poll coordinator against a mock thermostat.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use airobot_lib::entity::{HvacAction, sensors_for};
use airobot_lib::subscription::Subscribable;
use airobot_lib::{
    Coordinator, CoordinatorStatus, ErrorKind, HttpClient, PresetMode, SensorKind,
    ThermostatClimate, ThermostatConfig,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USERNAME: &str = "T0012AB";

fn config(server: &MockServer) -> ThermostatConfig {
    ThermostatConfig::new(server.uri(), USERNAME, "secret").with_room("Office")
}

fn coordinator(server: &MockServer) -> Coordinator<HttpClient> {
    Coordinator::from_config(&config(server)).unwrap()
}

async fn mount_documents(server: &MockServer, status: Value, settings: Value) {
    Mock::given(method("GET"))
        .and(path("/api/thermostat/getStatuses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/thermostat/getSettings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(settings))
        .mount(server)
        .await;
}

fn living_room_status() -> Value {
    json!({
        "CO2": 650,
        "HUM_AIR": 420,
        "TEMP_AIR": 212,
        "TEMP_FLOOR": 255,
        "AQI": 1,
        "STATUS_FLAGS": [{"HEATING_ON": 1}]
    })
}

fn home_settings() -> Value {
    json!({"MODE": 1, "SETPOINT_TEMP": 215, "SETPOINT_TEMP_AWAY": 170})
}

// ============================================================================
// Refresh
// ============================================================================

mod refresh {
    use super::*;

    #[tokio::test]
    async fn refresh_normalizes_both_documents() {
        let server = MockServer::start().await;
        mount_documents(&server, living_room_status(), home_settings()).await;

        let coordinator = coordinator(&server);
        assert_eq!(coordinator.name(), "Airobot Thermostat Office");

        coordinator.refresh().await.unwrap();
        let state = coordinator.current_state().unwrap();

        assert_eq!(state.air_temperature(), Some(21.2));
        assert_eq!(state.floor_temperature(), Some(25.5));
        assert_eq!(state.humidity(), Some(42.0));
        assert_eq!(state.co2_ppm(), Some(650));
        assert_eq!(state.air_quality_index(), 1);
        assert_eq!(state.preset_mode(), PresetMode::Home);
        assert!((state.setpoint_temperature() - 21.5).abs() < 1e-9);
        assert!(state.is_heating());
        assert_eq!(coordinator.status(), CoordinatorStatus::Ready);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_state_and_reports_status() {
        let server = MockServer::start().await;
        mount_documents(&server, living_room_status(), home_settings()).await;

        let coordinator = coordinator(&server);
        coordinator.refresh().await.unwrap();
        let before = coordinator.current_state().unwrap();

        let failures = Arc::new(AtomicU32::new(0));
        let failures_clone = failures.clone();
        coordinator.on_update_failed(move |error| {
            assert_eq!(error.upstream_status(), Some(500));
            failures_clone.fetch_add(1, Ordering::SeqCst);
        });

        server.reset().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = coordinator.refresh().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamStatus);

        let after = coordinator.current_state().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(coordinator.status(), CoordinatorStatus::Failed);
        assert_eq!(failures.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_body_fails_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/thermostat/getStatuses"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"TEMP_AIR\": "))
            .mount(&server)
            .await;

        let coordinator = coordinator(&server);
        let err = coordinator.refresh().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(coordinator.current_state().is_none());
    }

    #[tokio::test]
    async fn overlapping_refresh_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/thermostat/getStatuses"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(living_room_status())
                    .set_delay(Duration::from_millis(500)),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/thermostat/getSettings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(home_settings()))
            .mount(&server)
            .await;

        let coordinator = coordinator(&server);
        let first = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.refresh().await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        let second = coordinator.refresh().await.unwrap();
        assert!(second.is_skipped());

        let first = first.await.unwrap().unwrap();
        assert!(first.state().is_some());
    }

    #[tokio::test]
    async fn start_requires_a_successful_first_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let coordinator = coordinator(&server);
        let err = coordinator.start(Duration::from_secs(15)).await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(503));
        assert!(coordinator.current_state().is_none());
    }

    #[tokio::test]
    async fn start_then_stop() {
        let server = MockServer::start().await;
        mount_documents(&server, living_room_status(), home_settings()).await;

        let coordinator = coordinator(&server);
        let poller = coordinator.start(Duration::from_secs(15)).await.unwrap();
        assert!(coordinator.current_state().is_some());
        assert!(poller.is_running());

        poller.stop().await;
    }
}

// ============================================================================
// Setpoint writes
// ============================================================================

mod set_temperature {
    use super::*;

    #[tokio::test]
    async fn home_preset_writes_setpoint_temp() {
        let server = MockServer::start().await;
        mount_documents(&server, living_room_status(), home_settings()).await;
        Mock::given(method("POST"))
            .and(path("/api/thermostat/setSettings"))
            .and(body_json(json!({"DEVICE_ID": USERNAME, "SETPOINT_TEMP": 225})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let coordinator = coordinator(&server);
        coordinator.refresh().await.unwrap();
        let before = coordinator.current_state().unwrap();

        coordinator.set_temperature(22.5).await.unwrap();

        // The cached state only changes on the next refresh.
        let after = coordinator.current_state().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert!((after.setpoint_temperature() - 21.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn away_preset_writes_setpoint_temp_away() {
        let server = MockServer::start().await;
        mount_documents(
            &server,
            living_room_status(),
            json!({"MODE": 2, "SETPOINT_TEMP": 215, "SETPOINT_TEMP_AWAY": 170}),
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/api/thermostat/setSettings"))
            .and(body_json(json!({"DEVICE_ID": USERNAME, "SETPOINT_TEMP_AWAY": 225})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let coordinator = coordinator(&server);
        coordinator.refresh().await.unwrap();
        coordinator.set_temperature(22.5).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_write_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("out of range"))
            .mount(&server)
            .await;

        let coordinator = coordinator(&server);
        let err = coordinator.set_temperature(22.0).await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(400));
    }

    #[tokio::test]
    async fn out_of_range_value_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let coordinator = coordinator(&server);
        let err = coordinator.set_temperature(f64::NAN).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }
}

// ============================================================================
// Entity views
// ============================================================================

mod entities {
    use super::*;

    #[tokio::test]
    async fn climate_and_sensors_follow_refreshes() {
        let server = MockServer::start().await;
        mount_documents(&server, living_room_status(), home_settings()).await;

        let coordinator = coordinator(&server);
        coordinator.refresh().await.unwrap();

        let climate = ThermostatClimate::new(coordinator.clone());
        assert_eq!(climate.name(), "Airobot Office Thermostat");
        assert_eq!(climate.current_temperature(), Some(21.2));
        assert_eq!(climate.hvac_action(), Some(HvacAction::Heating));

        let sensors = sensors_for(&coordinator);
        assert_eq!(sensors.len(), 5);
        assert!(sensors.iter().any(|s| s.kind() == SensorKind::Co2));

        server.reset().await;
        mount_documents(
            &server,
            json!({"TEMP_AIR": 199, "STATUS_FLAGS": [{"HEATING_ON": 0}]}),
            home_settings(),
        )
        .await;
        coordinator.refresh().await.unwrap();

        assert_eq!(climate.current_temperature(), Some(19.9));
        assert_eq!(climate.hvac_action(), Some(HvacAction::Idle));
    }
}
