//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn clipcast_bin(config_home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_clipcast"));
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--resolution"))
        .stdout(predicate::str::contains("--duration"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--no-progress"))
        .stdout(predicate::str::contains("catalog"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("clipcast"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn catalog_lists_modes_and_resolutions() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home)
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Recording types:"))
        .stdout(predicate::str::contains("Screen with audio"))
        .stdout(predicate::str::contains("Resolutions:"));
}

#[test]
fn catalog_json_is_parseable() {
    let home = TempDir::new().unwrap();
    let output = clipcast_bin(&home)
        .args(["catalog", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["modes"].as_array().unwrap().len(), 4);
    assert_eq!(value["resolutions"].as_array().unwrap().len(), 5);
}

#[test]
fn catalog_follows_config_file() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("clipcast");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "resolutions = [\"800x600\"]\n").unwrap();

    let output = clipcast_bin(&home)
        .args(["catalog", "--json"])
        .output()
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["resolutions"].as_array().unwrap().len(), 1);
}

#[test]
fn config_path_command() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("clipcast"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_init_set_get() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home).args(["config", "init"]).assert().success();
    assert!(home.path().join("clipcast").join("config.toml").exists());

    clipcast_bin(&home)
        .args(["config", "set", "crf", "28"])
        .assert()
        .success();
    clipcast_bin(&home)
        .args(["config", "get", "crf"])
        .assert()
        .success()
        .stdout(predicate::str::diff("28\n"));
}

#[test]
fn config_list_shows_every_key() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stall_timeout"))
        .stdout(predicate::str::contains("linux.camera_device"))
        .stdout(predicate::str::contains("resolutions"));
}

#[test]
fn closed_stdin_exits_idle_session() {
    let home = TempDir::new().unwrap();
    clipcast_bin(&home)
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("Record Now"));
}
