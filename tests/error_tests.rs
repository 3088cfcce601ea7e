//! Error scenario integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const EXIT_ERROR: i32 = 1;
const EXIT_USAGE_ERROR: i32 = 2;

fn clipcast_bin(config_home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_clipcast"));
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn unknown_mode_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home)
        .args(["-m", "9", "-d", "1s"])
        .assert()
        .code(EXIT_USAGE_ERROR)
        .stderr(predicate::str::contains("Invalid recording type"));
}

#[test]
fn unknown_resolution_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home)
        .args(["-r", "0"])
        .write_stdin("")
        .assert()
        .code(EXIT_USAGE_ERROR)
        .stderr(predicate::str::contains("Invalid resolution"));
}

#[test]
fn invalid_duration_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home)
        .args(["-d", "forever"])
        .assert()
        .code(EXIT_USAGE_ERROR)
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn non_numeric_mode_is_rejected_by_parser() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home)
        .args(["-m", "screen"])
        .assert()
        .code(EXIT_USAGE_ERROR);
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home)
        .args(["config", "get", "unknown_key"])
        .assert()
        .code(EXIT_ERROR)
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_rejects_out_of_range_crf() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home)
        .args(["config", "set", "crf", "60"])
        .assert()
        .code(EXIT_ERROR)
        .stderr(predicate::str::contains("crf"));
}

#[test]
fn config_set_rejects_unknown_preset() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home)
        .args(["config", "set", "preset", "instant"])
        .assert()
        .code(EXIT_ERROR)
        .stderr(predicate::str::contains("Valid"));
}

#[test]
fn config_init_twice_fails() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home).args(["config", "init"]).assert().success();
    clipcast_bin(&home)
        .args(["config", "init"])
        .assert()
        .code(EXIT_ERROR);
}
