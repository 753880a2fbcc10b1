//! Integration tests for CLI argument handling
//!
//! Runs the `athletics` binary against an address nothing listens on, with
//! config and session directories pointed at a scratch location.

use std::process::{Command, Output};

use tempfile::TempDir;

const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Helper to run the CLI with given args and an isolated home
fn run_cli(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_athletics"))
        .args(args)
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_CACHE_HOME", home.path().join("cache"))
        .env_remove("ATHLETICS_TOKEN")
        .env_remove("ATHLETICS_API_URL")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute athletics")
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    let output = run_cli(&home, &["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("competitions"));
    assert!(stdout.contains("athlete-results"));
    assert!(stdout.contains("--api-url"));
}

#[test]
fn test_unknown_command_fails() {
    let home = TempDir::new().unwrap();
    let output = run_cli(&home, &["medals"]);
    assert!(!output.status.success());
}

#[test]
fn test_data_command_requires_login() {
    let home = TempDir::new().unwrap();
    let output = run_cli(&home, &["--api-url", UNREACHABLE, "stats"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Not logged in"),
        "Should tell the user to log in: {}",
        stderr
    );
}

#[test]
fn test_short_suggestion_query_needs_no_server() {
    let home = TempDir::new().unwrap();
    let output = run_cli(
        &home,
        &["--api-url", UNREACHABLE, "--token", "t", "suggest", "j"],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No athletes"));
}

#[test]
fn test_unreachable_server_prints_error() {
    let home = TempDir::new().unwrap();
    let output = run_cli(
        &home,
        &["--api-url", UNREACHABLE, "--token", "t", "competitions"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error: Failed to send GET request to /api/competitions"),
        "unexpected stderr: {}",
        stderr
    );
}

#[test]
fn test_log_file_replaces_stderr_logging() {
    let home = TempDir::new().unwrap();
    let logs = TempDir::new().unwrap();
    let log_path = logs.path().join("athletics.log");
    let output = Command::new(env!("CARGO_BIN_EXE_athletics"))
        .args(["--api-url", UNREACHABLE, "--log-file"])
        .arg(&log_path)
        .arg("health")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_CACHE_HOME", home.path().join("cache"))
        .env_remove("ATHLETICS_TOKEN")
        .env_remove("ATHLETICS_API_URL")
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to execute athletics");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "unexpected stderr: {}", stderr);
    assert!(
        !stderr.contains("athletics starting"),
        "log lines leaked to stderr: {}",
        stderr
    );

    let written: String = std::fs::read_dir(logs.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("athletics.log"))
        .map(|entry| std::fs::read_to_string(entry.path()).unwrap())
        .collect();
    assert!(
        written.contains("athletics starting"),
        "log file missing startup line: {:?}",
        written
    );
}
