//! Command-line tests for the `micsession` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn micsession() -> Command {
    let mut cmd = Command::cargo_bin("micsession").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_init_then_run_all_scenarios() {
    let dir = tempdir().unwrap();

    micsession()
        .args(["init", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("scenarios/stage-toggle-revert.yaml"));

    micsession()
        .args(["run", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS stage-toggle-revert"))
        .stdout(predicate::str::contains("PASS device-switch"));
}

#[test]
fn test_init_refuses_existing_directory() {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join(".mic-session")).unwrap();

    micsession()
        .args(["init", "--root"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_run_unknown_scenario_fails() {
    let dir = tempdir().unwrap();

    micsession()
        .args(["run", "nope", "--root"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown scenario 'nope'"));
}

#[test]
fn test_scenarios_lists_names() {
    let dir = tempdir().unwrap();
    micsession()
        .args(["init", "--minimal", "--root"])
        .arg(dir.path())
        .assert()
        .success();

    micsession()
        .args(["scenarios", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("stage-toggle-revert"))
        .stdout(predicate::str::contains("device-switch").not());
}

#[test]
fn test_simulate_keeps_selection() {
    let dir = tempdir().unwrap();

    micsession()
        .args(["simulate", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("selected: USB Microphone"))
        .stdout(predicate::str::contains("reverts masked: 2"));
}

#[test]
fn test_simulate_json_emits_events() {
    let dir = tempdir().unwrap();

    micsession()
        .args(["simulate", "--json", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type":"sessionInitialized""#))
        .stdout(predicate::str::contains(r#""type":"sessionClosed""#));
}
