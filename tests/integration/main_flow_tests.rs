use serial_test::serial;
use std::process::Command;

use crate::common::binary_path;

/// Test that the application exits with error code when database connection fails
#[test]
#[serial]
fn test_application_exits_on_connection_failure() {
    let output = Command::new(binary_path())
        .args(["ranked", "1"])
        .env(
            "CONNECTION_STRING",
            "host=invalid_host port=5432 user=postgres password=wrong dbname=nonexistent connect_timeout=2"
        )
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to execute recommender");

    // Should exit with error code
    assert!(!output.status.success(), "Process should fail with invalid connection");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to connect to database"),
        "Should log connection error. Got: {}",
        stderr
    );
    assert!(
        stderr.contains("Application cannot start without a valid database connection"),
        "Should log clear message about needing database connection"
    );
}

/// Test that the application handles missing CONNECTION_STRING environment variable
#[test]
#[serial]
fn test_application_exits_on_missing_connection_string() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    // Run without CONNECTION_STRING and from a directory without .env
    let output = Command::new(binary_path())
        .args(["ranked", "1"])
        .current_dir(temp_dir.path())
        .env_clear()
        .env("RUST_LOG", "error")
        .env("PATH", std::env::var("PATH").unwrap_or_default())
        .output()
        .expect("Failed to execute recommender");

    assert!(
        !output.status.success(),
        "Process should fail without CONNECTION_STRING"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("CONNECTION_STRING"),
        "Should report missing CONNECTION_STRING. Got: {}",
        stderr
    );
}

#[test]
#[serial]
fn test_application_requires_a_command() {
    let output = Command::new(binary_path())
        .env("CONNECTION_STRING", "host=localhost")
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to execute recommender");

    assert!(!output.status.success());
}
