#![allow(dead_code, clippy::unwrap_used)]
// Shared wiremock fixtures for the coordinator, session, and poller tests.

use std::time::Duration;

use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schluter_core::{Coordinator, CoordinatorConfig, Credentials, SchluterClient};

pub const LOGIN_PATH: &str = "/api/authenticate/user";
pub const THERMOSTATS_PATH: &str = "/api/thermostats";

pub fn client_for(server: &MockServer) -> SchluterClient {
    SchluterClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap())
}

pub fn credentials() -> Credentials {
    Credentials::new("me@example.com", "hunter2".to_string().into())
}

pub fn coordinator(server: &MockServer, config: CoordinatorConfig) -> Coordinator {
    Coordinator::new(client_for(server), credentials(), config)
}

pub fn fast_config() -> CoordinatorConfig {
    CoordinatorConfig {
        interval: Duration::from_millis(50),
        timeout: Duration::from_secs(2),
        ..CoordinatorConfig::default()
    }
}

// ── Response bodies ─────────────────────────────────────────────────

pub fn login_ok(session_id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "SessionId": session_id,
        "NewAccount": false,
        "ErrorCode": 0
    }))
}

pub fn login_wrong_password() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "SessionId": "", "ErrorCode": 2 }))
}

pub fn thermostats_body() -> Value {
    json!({
        "Groups": [{
            "GroupName": "Home",
            "Thermostats": [
                {
                    "SerialNumber": "device-1",
                    "Room": "Bathroom",
                    "Temperature": 2150,
                    "SetPointTemp": 2200,
                    "RegulationMode": 1,
                    "Heating": true,
                    "Online": true
                }
            ]
        }]
    })
}

pub fn thermostats_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(thermostats_body())
}

// ── Mount helpers ───────────────────────────────────────────────────

pub async fn mount_login(server: &MockServer, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

pub async fn mount_thermostats(server: &MockServer, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(THERMOSTATS_PATH))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

/// Count received requests to `path_str`.
pub async fn hits(server: &MockServer, path_str: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == path_str)
        .count()
}
