//! Integration tests for the `schluter` CLI binary.
//!
//! Argument parsing and error handling run without a network; the
//! end-to-end cases point `--base-url` at a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `schluter` binary with env isolation.
fn schluter_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("schluter");
    cmd.env("HOME", "/tmp/schluter-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/schluter-cli-test-nonexistent")
        .env_remove("SCHLUTER_CONFIG")
        .env_remove("SCHLUTER_USERNAME")
        .env_remove("SCHLUTER_PASSWORD")
        .env_remove("SCHLUTER_BASE_URL")
        .env_remove("SCHLUTER_INTERVAL")
        .env_remove("SCHLUTER_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Same as [`schluter_cmd`], with credentials and a mock endpoint.
fn authed_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = schluter_cmd();
    cmd.env("SCHLUTER_USERNAME", "me@example.com")
        .env("SCHLUTER_PASSWORD", "hunter2")
        .args(["--base-url", &server.uri(), "--color", "never"]);
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mount_login_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/authenticate/user"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "SessionId": "sess-1", "ErrorCode": 0 })),
        )
        .mount(server)
        .await;
}

async fn mount_thermostats_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/thermostats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Groups": [{
                "GroupName": "Home",
                "Thermostats": [{
                    "SerialNumber": "device-1",
                    "Room": "Bathroom",
                    "Temperature": 2150,
                    "SetPointTemp": 2200,
                    "RegulationMode": 1,
                    "MinTemp": 500,
                    "MaxTemp": 4000,
                    "Heating": true,
                    "Online": true
                }]
            }]
        })))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = schluter_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    schluter_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("show")
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("set-temperature")),
    );
}

#[test]
fn test_version_flag() {
    schluter_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("schluter"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_show_without_credentials() {
    schluter_cmd()
        .arg("show")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No credentials"));
}

#[test]
fn test_invalid_interval_is_usage_error() {
    let output = schluter_cmd()
        .args(["--interval", "soon", "show"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_bad_config_file_value() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(
        &file,
        "username = \"me@example.com\"\npassword = \"pw\"\ntimeout = \"0s\"\n",
    )
    .unwrap();

    schluter_cmd()
        .args(["--config", file.to_str().unwrap(), "show"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("timeout"));
}

// ── Against a mock service ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_show_prints_thermostats() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    mount_thermostats_ok(&server).await;

    authed_cmd(&server)
        .arg("show")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Bathroom")
                .and(predicate::str::contains("21.5 °C"))
                .and(predicate::str::contains("device-1")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_json() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    mount_thermostats_ok(&server).await;

    let output = authed_cmd(&server)
        .args(["--output", "json", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["device-1"]["GroupName"], "Home");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_password_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/authenticate/user"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "SessionId": "", "ErrorCode": 2 })),
        )
        .mount(&server)
        .await;

    authed_cmd(&server)
        .arg("show")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Authentication failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_service_error_exits_with_connection_code() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/thermostats"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    authed_cmd(&server).arg("show").assert().code(7);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_setup_timeout_exits_with_timeout_code() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/thermostats"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)))
        .mount(&server)
        .await;

    authed_cmd(&server)
        .args(["--timeout", "300ms", "watch"])
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .code(8)
        .stderr(predicate::str::contains("timed out"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_temperature_posts_hundredths() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    mount_thermostats_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/thermostat"))
        .and(query_param("serialnumber", "device-1"))
        .and(body_partial_json(json!({ "ManualTemperature": 2350, "RegulationMode": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Success": true })))
        .expect(1)
        .mount(&server)
        .await;

    authed_cmd(&server)
        .args(["set-temperature", "device-1", "23.5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Bathroom held at 23.5"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_temperature_unknown_serial() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    mount_thermostats_ok(&server).await;

    authed_cmd(&server)
        .args(["set-temperature", "nope", "21"])
        .assert()
        .code(4);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_temperature_out_of_range() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    mount_thermostats_ok(&server).await;

    authed_cmd(&server)
        .args(["set-temperature", "device-1", "55"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("outside"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_stops_after_count() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    mount_thermostats_ok(&server).await;

    authed_cmd(&server)
        .args(["--interval", "100ms", "watch", "--count", "2"])
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .success()
        .stdout(predicate::str::contains("Bathroom"));
}
