//! Basic CLI tests for the intentbench command-line interface.

use assert_cmd::Command;
use predicates::prelude::*;

// Include command-specific test modules
mod commands;

/// Test that the CLI binary exists and shows help.
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("intentbench").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("parse scheduling requests"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("run-all"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("list-models"))
        .stdout(predicate::str::contains("list-prompts"))
        .stdout(predicate::str::contains("backend-models"));
}

/// Test that the CLI shows version information.
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("intentbench").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("intentbench"));
}

/// Test the verbose flag is accepted as a global flag.
#[test]
fn test_verbose_flag_accepted() {
    let mut cmd = Command::cargo_bin("intentbench").unwrap();
    cmd.arg("--verbose").arg("list-prompts");

    cmd.assert().success();
}

/// Test that providing no subcommand shows an error.
#[test]
fn test_no_subcommand_shows_error() {
    let mut cmd = Command::cargo_bin("intentbench").unwrap();

    // Clap's error code for a missing required subcommand
    cmd.assert().failure().code(2);
}
