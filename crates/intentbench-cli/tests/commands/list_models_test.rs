//! Tests for the `list-models` command.

use assert_cmd::Command;
use predicates::prelude::*;

/// Test that the built-in catalog is listed.
#[test]
fn test_list_models_builtin_catalog() {
    let mut cmd = Command::cargo_bin("intentbench").unwrap();
    cmd.arg("list-models").env_remove("INTENTBENCH_MODELS_FILE");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("gemma3_1b"))
        .stdout(predicate::str::contains("qwen3:1.7b"))
        .stdout(predicate::str::contains("qwen3_0_6b_mod"));
}

/// Test that a TOML catalog replaces the built-in models.
#[test]
fn test_list_models_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("models.toml");
    std::fs::write(
        &path,
        "[[models]]\nkey = \"phi\"\nname = \"phi4-mini\"\ndescription = \"tiny phi\"\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("intentbench").unwrap();
    cmd.arg("--models-file").arg(&path).arg("list-models");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("phi4-mini"))
        .stdout(predicate::str::contains("tiny phi"))
        .stdout(predicate::str::contains("gemma3_1b").not());
}

/// Test that a broken catalog file is reported.
#[test]
fn test_list_models_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("models.toml");
    std::fs::write(&path, "models = 3").unwrap();

    let mut cmd = Command::cargo_bin("intentbench").unwrap();
    cmd.arg("--models-file").arg(&path).arg("list-models");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load model catalog"));
}
