//! Integration tests for the `purelink` CLI binary.
//!
//! These tests validate argument parsing, help output, and error handling
//! without touching the network or the user's real configuration.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `purelink` binary with env isolation.
fn purelink_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("purelink");
    cmd.env("HOME", "/tmp/purelink-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/purelink-cli-test-nonexistent")
        .env("XDG_CACHE_HOME", "/tmp/purelink-cli-test-nonexistent")
        .env_remove("PURELINK_PROFILE")
        .env_remove("PURELINK_EMAIL")
        .env_remove("PURELINK_COUNTRY")
        .env_remove("PURELINK_OUTPUT")
        .env_remove("PURELINK_PASSWORD");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = purelink_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    purelink_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Dyson cloud")
            .and(predicate::str::contains("login"))
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("logout")),
    );
}

#[test]
fn test_version_flag() {
    purelink_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("purelink"));
}

#[test]
fn test_devices_help_documents_legacy_listing() {
    purelink_cmd()
        .args(["devices", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--all").and(predicate::str::contains("double-pass")));
}

// ── Validation ──────────────────────────────────────────────────────

#[test]
fn test_invalid_output_format_rejected() {
    let output = purelink_cmd()
        .args(["--output", "xml", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_lowercase_country_rejected() {
    let output = purelink_cmd()
        .args([
            "devices",
            "--email",
            "user@example.com",
            "--country",
            "gb",
        ])
        .output()
        .unwrap();
    assert_ne!(output.status.code(), Some(0));
    let text = combined_output(&output);
    assert!(
        text.contains("country"),
        "Expected country validation error:\n{text}"
    );
}

#[test]
fn test_devices_without_session_fails_offline() {
    // No config, no cache: must fail before any network call.
    let output = purelink_cmd()
        .args(["devices", "--email", "user@example.com", "--country", "GB"])
        .output()
        .unwrap();
    assert_ne!(output.status.code(), Some(0));
    let text = combined_output(&output);
    assert!(
        text.contains("logged in") || text.contains("login"),
        "Expected a not-logged-in error:\n{text}"
    );
}

#[test]
fn test_logout_without_profile_fails_cleanly() {
    let output = purelink_cmd().arg("logout").output().unwrap();
    assert_ne!(output.status.code(), Some(0));
    let text = combined_output(&output);
    assert!(
        text.contains("Profile") || text.contains("profile"),
        "Expected a profile error:\n{text}"
    );
}
