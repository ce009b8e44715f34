// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP transport using wiremock.

use std::time::Duration;

use airobot_lib::protocol::{ApiPaths, HttpClient, HttpConfig, Transport};
use airobot_lib::types::{SetpointField, Tenths};
use airobot_lib::{Error, ErrorKind, ProtocolError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USERNAME: &str = "T0012AB";
const PASSWORD: &str = "secret";

fn client(server: &MockServer) -> HttpClient {
    HttpConfig::new(server.uri(), USERNAME, PASSWORD)
        .into_client()
        .unwrap()
}

fn auth() -> String {
    HttpClient::basic_auth(USERNAME, PASSWORD)
}

// ============================================================================
// Reads
// ============================================================================

mod reads {
    use super::*;

    #[tokio::test]
    async fn fetch_status_sends_basic_auth() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/thermostat/getStatuses"))
            .and(header("authorization", auth().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "CO2": 640,
                "TEMP_AIR": 215,
                "STATUS_FLAGS": [{"HEATING_ON": 1}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let status = client(&server).fetch_status().await.unwrap();
        assert_eq!(status["CO2"], 640);
        assert_eq!(status["TEMP_AIR"], 215);
    }

    #[tokio::test]
    async fn fetch_settings() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/thermostat/getSettings"))
            .and(header("authorization", auth().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MODE": 2,
                "SETPOINT_TEMP": 210,
                "SETPOINT_TEMP_AWAY": 180
            })))
            .mount(&server)
            .await;

        let settings = client(&server).fetch_settings().await.unwrap();
        assert_eq!(settings["MODE"], 2);
    }

    #[tokio::test]
    async fn custom_paths() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"TEMP_AIR": 200})))
            .mount(&server)
            .await;

        let paths = ApiPaths {
            status: "/status".to_string(),
            ..ApiPaths::default()
        };
        let client = HttpConfig::new(server.uri(), USERNAME, PASSWORD)
            .with_paths(paths)
            .into_client()
            .unwrap();

        let status = client.fetch_status().await.unwrap();
        assert_eq!(status["TEMP_AIR"], 200);
    }

    #[tokio::test]
    async fn server_error_is_upstream_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client(&server).fetch_status().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamStatus);
        assert_eq!(err.upstream_status(), Some(500));
    }

    #[tokio::test]
    async fn non_200_success_is_upstream_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let err = client(&server).fetch_settings().await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(204));
    }

    #[tokio::test]
    async fn wrong_credentials_are_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(header("authorization", auth().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .with_priority(10)
            .mount(&server)
            .await;

        let client = HttpConfig::new(server.uri(), USERNAME, "wrong")
            .into_client()
            .unwrap();
        let err = client.fetch_status().await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(401));
    }

    #[tokio::test]
    async fn invalid_json_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let err = client(&server).fetch_status().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn slow_device_is_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = HttpConfig::new(server.uri(), USERNAME, PASSWORD)
            .with_timeout(Duration::from_millis(200))
            .into_client()
            .unwrap();

        let err = client.fetch_status().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(matches!(err, Error::Protocol(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn unreachable_device_is_network_error() {
        let client = HttpConfig::new("http://127.0.0.1:1", USERNAME, PASSWORD)
            .with_timeout(Duration::from_secs(2))
            .into_client()
            .unwrap();

        let err = client.fetch_status().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}

// ============================================================================
// Writes
// ============================================================================

mod writes {
    use super::*;

    #[tokio::test]
    async fn push_setting_posts_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/thermostat/setSettings"))
            .and(header("authorization", auth().as_str()))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"DEVICE_ID": USERNAME, "SETPOINT_TEMP": 225})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .push_setting(SetpointField::Home, Tenths::new(225))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn push_away_setting() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_json(json!({"DEVICE_ID": USERNAME, "SETPOINT_TEMP_AWAY": 165})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .push_setting(SetpointField::Away, Tenths::from_celsius(16.5).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejected_write_carries_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid setpoint"))
            .mount(&server)
            .await;

        let err = client(&server)
            .push_setting(SetpointField::Home, Tenths::new(990))
            .await
            .unwrap_err();

        match err {
            Error::Protocol(ProtocolError::UpstreamStatus { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, "invalid setpoint");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
