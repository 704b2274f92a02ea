//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, each subcommand
//! responds to `--help`, and fatal configuration problems stop a run before
//! any network traffic.

#![allow(deprecated)] // cargo_bin deprecation; replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: a `nowshowing` command isolated from the caller's environment.
fn nowshowing() -> Command {
    let mut cmd = Command::cargo_bin("nowshowing").expect("binary 'nowshowing' should be built");
    for var in [
        "OMDB_API_KEY",
        "NOWSHOWING_PROVIDER",
        "NOWSHOWING_LISTING_URL",
        "NOWSHOWING_DELAY_MS",
        "NOWSHOWING_DATA_DIR",
        "NOWSHOWING_CHROMIUM_PATH",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Write a config file into `dir` and return its path as a string.
fn config_file(dir: &tempfile::TempDir, content: &str) -> String {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    nowshowing()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: nowshowing"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("detail"))
        .stdout(predicate::str::contains("lookup"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn version_flag_shows_semver() {
    nowshowing()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^nowshowing \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_shows_error_and_usage() {
    nowshowing()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: nowshowing"));
}

#[test]
fn invalid_subcommand_fails() {
    nowshowing()
        .arg("this-is-not-a-real-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─── Subcommand help ─────────────────────────────────────────────────────────

#[test]
fn run_help() {
    nowshowing()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("enrich it with ratings"))
        .stdout(predicate::str::contains("--provider"))
        .stdout(predicate::str::contains("--listing-url"))
        .stdout(predicate::str::contains("--delay-ms"))
        .stdout(predicate::str::contains("--data-dir"));
}

#[test]
fn detail_help() {
    nowshowing()
        .args(["detail", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extract one detail page"))
        .stdout(predicate::str::contains("<URL>"))
        .stdout(predicate::str::contains("--trace"));
}

#[test]
fn lookup_help() {
    nowshowing()
        .args(["lookup", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<EXTERNAL_ID>"))
        .stdout(predicate::str::contains("--provider"));
}

// ─── Argument and configuration validation ───────────────────────────────────

#[test]
fn detail_missing_url_fails() {
    nowshowing()
        .arg("detail")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<URL>"));
}

#[test]
fn unknown_provider_is_rejected() {
    nowshowing()
        .args(["run", "--provider", "carrier-pigeon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("carrier-pigeon"));
}

#[test]
fn api_run_without_key_fails_before_fetching() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_file(&dir, "listing_url = \"http://127.0.0.1:9/now-playing\"\n");

    nowshowing()
        .args(["--config", &config, "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OMDB_API_KEY"));
}

#[test]
fn missing_explicit_config_fails() {
    nowshowing()
        .args(["--config", "/definitely/not/here.toml", "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not/here.toml"));
}

#[test]
fn lookup_rejects_malformed_id() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_file(&dir, "omdb_api_key = \"k\"\n");

    nowshowing()
        .args(["--config", &config, "lookup", "heat-1995"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an external title id"));
}
