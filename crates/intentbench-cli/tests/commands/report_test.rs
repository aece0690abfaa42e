//! Tests for the `report` command.

use assert_cmd::Command;
use predicates::prelude::*;

/// Test that an empty results directory yields an explicit message.
#[test]
fn test_report_empty_dir() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("intentbench").unwrap();
    cmd.arg("--results-dir").arg(dir.path()).arg("report");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Nothing to analyze"));
}

/// Test that report accepts the JSON flag.
#[test]
fn test_report_json_flag_in_help() {
    let mut cmd = Command::cargo_bin("intentbench").unwrap();
    cmd.arg("report").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--json"));
}
