//! Tests for the `run` and `run-all` commands that need no backend.

use assert_cmd::Command;
use predicates::prelude::*;

/// Test that the default prompt variant is shown in help.
#[test]
fn test_run_default_prompt_in_help() {
    let mut cmd = Command::cargo_bin("intentbench").unwrap();
    cmd.arg("run").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("production"));
}

/// Test that an unknown model key fails before contacting a backend.
#[test]
fn test_run_unknown_model() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("intentbench").unwrap();
    cmd.arg("--results-dir")
        .arg(dir.path())
        .arg("--endpoint")
        .arg("http://127.0.0.1:9")
        .arg("run")
        .arg("llama_70b");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown model: llama_70b"));
}

/// Test that run-all validates every key up front.
#[test]
fn test_run_all_unknown_model() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("intentbench").unwrap();
    cmd.arg("--results-dir")
        .arg(dir.path())
        .arg("run-all")
        .arg("--models")
        .arg("gemma3_1b")
        .arg("nope");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown model: nope"));
}
