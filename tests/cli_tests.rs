//! CLI integration tests

use std::path::Path;
use std::process::Command;

use assert_cmd::Command as AssertCommand;
use predicates::prelude::*;
use tempfile::TempDir;

fn recorder_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_segment-recorder"))
}

/// Binary isolated from the user's config and colour settings
fn isolated(config_home: &Path) -> AssertCommand {
    let mut cmd = AssertCommand::cargo_bin("segment-recorder").expect("binary should build");
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0");
    cmd
}

#[test]
fn help_output() {
    let output = recorder_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("segments"));
    assert!(stdout.contains("--max-duration"));
    assert!(stdout.contains("--device"));
    assert!(stdout.contains("--flash"));
    assert!(stdout.contains("--output-dir"));
    assert!(stdout.contains("--verbose"));
}

#[test]
fn version_output() {
    let output = recorder_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("segment-recorder"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let home = TempDir::new().unwrap();
    isolated(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("segment-recorder"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_help() {
    let output = recorder_bin()
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("set"));
    assert!(stdout.contains("get"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("path"));
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();

    isolated(home.path())
        .args(["config", "set", "video.bitrate", "750000"])
        .assert()
        .success();

    isolated(home.path())
        .args(["config", "get", "video.bitrate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("750000"));

    isolated(home.path())
        .args(["config", "get", "audio.bitrate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let home = TempDir::new().unwrap();

    isolated(home.path()).args(["config", "init"]).assert().success();
    isolated(home.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_duration: 3s"))
        .stdout(predicate::str::contains("device: front"));

    isolated(home.path())
        .args(["config", "init"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    isolated(home.path())
        .args(["config", "set", "video.codec", "h264"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_rejects_invalid_values() {
    let home = TempDir::new().unwrap();

    isolated(home.path())
        .args(["config", "set", "max_duration", "forever"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid duration"));

    isolated(home.path())
        .args(["config", "set", "device", "side"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid device"));
}

#[test]
fn invalid_duration_is_usage_error() {
    let home = TempDir::new().unwrap();
    isolated(home.path())
        .args(["--max-duration", "invalid"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn invalid_device_is_rejected_by_parser() {
    let output = recorder_bin()
        .args(["--device", "side"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn session_toggles_flash_and_device() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    isolated(home.path())
        .arg("--output-dir")
        .arg(out.path())
        .write_stdin("status\nflash\nflash\nswitch\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("state: idle"))
        .stdout(predicate::str::contains("flash: light"))
        .stdout(predicate::str::contains("flash: off"))
        .stdout(predicate::str::contains("device: back"));
}

#[test]
fn session_records_and_previews_take() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    isolated(home.path())
        .args(["--max-duration", "10s", "--output-dir"])
        .arg(out.path())
        .write_stdin("record\nwait 200ms\npause\nstatus\npreview\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("state: paused"))
        .stdout(predicate::str::contains("segments: 1"))
        .stdout(predicate::str::contains("take-0.json"));

    assert!(out.path().join("take-0.json").exists());
}

#[test]
fn session_locks_when_budget_runs_out() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    isolated(home.path())
        .args(["--max-duration", "100ms", "--output-dir"])
        .arg(out.path())
        .write_stdin("record\nwait 400ms\nstatus\nrecord\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("state: limit reached"))
        .stderr(predicate::str::contains("Recording limit reached"))
        .stderr(predicate::str::contains("record ignored"));
}

#[test]
fn session_reports_out_of_range_removal() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    isolated(home.path())
        .arg("--output-dir")
        .arg(out.path())
        .write_stdin("remove 5\nbogus\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("out of range"))
        .stderr(predicate::str::contains("Unknown command"));
}
