//! Integration tests for the `vitrina` CLI binary.
//!
//! Argument parsing, completions, and configuration errors. None of these
//! reach a live marketplace.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `vitrina` binary with env isolation.
///
/// Clears all `VITRINA_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn vitrina_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("vitrina");
    cmd.env("HOME", "/tmp/vitrina-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/vitrina-cli-test-nonexistent")
        .env_remove("VITRINA_PROFILE")
        .env_remove("VITRINA_API_URL")
        .env_remove("VITRINA_IDENTITY_URL")
        .env_remove("VITRINA_IDENTITY_KEY")
        .env_remove("VITRINA_OUTPUT")
        .env_remove("VITRINA_TIMEOUT")
        .env_remove("VITRINA_EMAIL")
        .env_remove("VITRINA_PASSWORD")
        .env_remove("VITRINA_TOKEN");
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
    let output = vitrina_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_top_level_commands() {
    vitrina_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("shops")
            .and(predicate::str::contains("streams"))
            .and(predicate::str::contains("reels"))
            .and(predicate::str::contains("merchant"))
            .and(predicate::str::contains("admin")),
    );
}

#[test]
fn test_version_flag() {
    vitrina_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vitrina"));
}

#[test]
fn test_spanish_alias_resolves() {
    vitrina_cmd()
        .args(["tiendas", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    vitrina_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    vitrina_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vitrina"));
}

#[test]
fn test_completions_fish() {
    vitrina_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = vitrina_cmd().arg("nonexistent").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_stream_filter() {
    let output = vitrina_cmd()
        .args(["streams", "list", "--filter", "someday"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_create_stream_requires_title() {
    let output = vitrina_cmd()
        .args(["merchant", "create-stream", "--platform", "Instagram"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("--title"), "Expected '--title' in output:\n{text}");
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_missing_api_url_is_a_setting_error() {
    let output = vitrina_cmd().args(["shops", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("API URL"), "Expected missing setting in output:\n{text}");
}

#[test]
fn test_unknown_profile_is_not_found() {
    let output = vitrina_cmd()
        .args(["--profile", "nope", "shops", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("nope"), "Expected profile name in output:\n{text}");
}

#[test]
fn test_config_use_unknown_profile() {
    let output = vitrina_cmd().args(["config", "use", "nope"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_config_show_without_file() {
    vitrina_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}
