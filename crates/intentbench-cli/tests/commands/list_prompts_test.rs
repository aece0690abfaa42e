//! Tests for the `list-prompts` command.

use assert_cmd::Command;
use predicates::prelude::*;

/// Test that every prompt variant is listed.
#[test]
fn test_list_prompts() {
    let mut cmd = Command::cargo_bin("intentbench").unwrap();
    cmd.arg("list-prompts");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("production"))
        .stdout(predicate::str::contains("multilingual"))
        .stdout(predicate::str::contains("concise"))
        .stdout(predicate::str::contains("structured"))
        .stdout(predicate::str::contains("chain_of_thought"));
}
