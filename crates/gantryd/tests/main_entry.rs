//! Integration tests for the `gantryd` binary entry point.
//!
//! Startup failures must print a diagnostic and exit non-zero before any
//! socket is bound.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

#[test]
fn missing_home_exits_with_diagnostic() {
    let mut command = cargo_bin_cmd!("gantryd");
    command.env_remove("GANTRY_HOME");
    command.assert().failure().stderr(contains("GANTRY_HOME"));
}

#[test]
fn missing_definitions_exit_with_diagnostic() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut command = cargo_bin_cmd!("gantryd");
    command.env("GANTRY_HOME", dir.path());
    command
        .assert()
        .failure()
        .stderr(contains("command definitions"));
}
