//! Integration tests for commands that talk to the backend.
//!
//! A one-shot `MockBackend` stands in for the dashboard API so these tests
//! can check endpoint and header selection per session mode.

mod common;

use common::{MockBackend, TestEnv, parse_json};
use predicates::prelude::*;

const STATS_BODY: &str = r#"{
    "vehicle_name": "DevTesla",
    "battery_level": 76,
    "battery_range": 231.4,
    "charging_state": "Disconnected",
    "locked": true,
    "shift_state": "P"
}"#;

#[test]
fn test_stats_in_developer_mode_uses_dev_endpoint() {
    let env = TestEnv::new();
    let backend = MockBackend::respond(200, STATS_BODY);

    let output = env
        .tdash()
        .args(["--base-url", &backend.base_url, "stats"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = parse_json(&output.stdout);
    assert_eq!(json["mode"], "developer");
    assert_eq!(json["stats"]["battery_level"], 76);

    let request = backend.request();
    assert_eq!(request.request_line, "GET /api/dev/stats HTTP/1.1");
    assert_eq!(request.header("x-api-key"), None);
    assert_eq!(request.header("content-type"), Some("application/json"));
}

#[test]
fn test_stats_human_renders_widgets() {
    let env = TestEnv::new();
    let backend = MockBackend::respond(200, STATS_BODY);

    env.tdash()
        .args(["--base-url", &backend.base_url, "stats", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vehicle: DevTesla"))
        .stdout(predicate::str::contains("Level: 76%"))
        .stdout(predicate::str::contains("Est. Range: 231 mi"))
        .stdout(predicate::str::contains("Vehicle Lock: Locked"))
        .stdout(predicate::str::contains("Gear: P"));
}

#[test]
fn test_real_mode_sends_api_key() {
    let env = TestEnv::new();
    env.tdash().args(["key", "set", "abc123"]).assert().success();

    let backend = MockBackend::respond(200, STATS_BODY);
    env.tdash()
        .args(["--base-url", &backend.base_url, "stats"])
        .assert()
        .success();

    let request = backend.request();
    assert_eq!(request.request_line, "GET /api/stats HTTP/1.1");
    assert_eq!(request.header("x-api-key"), Some("abc123"));
}

#[test]
fn test_real_mode_without_key_refuses() {
    let env = TestEnv::new();
    env.tdash().arg("toggle").assert().success();

    let backend = MockBackend::respond(200, STATS_BODY);
    let output = env
        .tdash()
        .args(["--base-url", &backend.base_url, "lock"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let err = parse_json(&output.stderr);
    assert_eq!(err["error"], "API Key required for this operation.");
    assert!(backend.was_not_called());
}

#[test]
fn test_lock_reports_backend_message() {
    let env = TestEnv::new();
    let backend = MockBackend::respond(200, r#"{"success": true, "message": "Locked (mock)"}"#);

    let output = env
        .tdash()
        .args(["--base-url", &backend.base_url, "lock"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = parse_json(&output.stdout);
    assert_eq!(json["command"], "lock");
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Locked (mock)");

    assert_eq!(backend.request().request_line, "POST /api/dev/lock HTTP/1.1");
}

#[test]
fn test_unlock_with_empty_response() {
    let env = TestEnv::new();
    env.tdash().args(["key", "set", "abc123"]).assert().success();
    let backend = MockBackend::respond(204, "");

    env.tdash()
        .args(["--base-url", &backend.base_url, "unlock", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unlock command sent."));

    let request = backend.request();
    assert_eq!(request.request_line, "POST /api/unlock HTTP/1.1");
    assert_eq!(request.header("x-api-key"), Some("abc123"));
}

#[test]
fn test_backend_error_message_is_reported() {
    let env = TestEnv::new();
    env.tdash().args(["key", "set", "wrong"]).assert().success();
    let backend = MockBackend::respond(401, r#"{"message": "Invalid API key"}"#);

    env.tdash()
        .args(["--base-url", &backend.base_url, "camera", "-H"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Invalid API key"));

    // A rejected key stays in the session.
    let output = env.tdash().arg("status").output().unwrap();
    assert_eq!(parse_json(&output.stdout)["credential_confirmed"], true);
}

#[test]
fn test_camera_feed_url() {
    let env = TestEnv::new();
    let backend =
        MockBackend::respond(200, r#"{"camera_feed_url": "http://localhost:8080/cam.jpg"}"#);

    let output = env
        .tdash()
        .args(["--base-url", &backend.base_url, "camera"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        parse_json(&output.stdout)["camera_feed_url"],
        "http://localhost:8080/cam.jpg"
    );
    assert_eq!(backend.request().request_line, "GET /api/dev/camera HTTP/1.1");
}

#[test]
fn test_unreachable_backend_fails() {
    let env = TestEnv::new();

    env.tdash()
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP request failed"));
}

#[test]
fn test_store_warnings_are_reported_with_results() {
    let env = TestEnv::new();
    std::fs::write(env.data_path().join("state.kdl"), "isDevMode {{{").unwrap();
    let backend = MockBackend::respond(200, STATS_BODY);

    let output = env
        .tdash()
        .args(["--base-url", &backend.base_url, "stats"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = parse_json(&output.stdout);
    assert_eq!(json["mode"], "developer");
    let warnings = json["warnings"].as_array().unwrap();
    assert!(
        warnings[0]
            .as_str()
            .unwrap()
            .contains("Persistent store unavailable")
    );

    // The unreadable file is left as it was.
    assert_eq!(env.state_file(), "isDevMode {{{");
}
