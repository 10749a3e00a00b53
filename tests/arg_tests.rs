//! Tests the argument-handling paths that exit without starting the monitor.

mod util;

use assert_cmd::prelude::*;
use predicates::prelude::*;

use util::batw_command;

#[test]
fn test_version() {
    batw_command()
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains("batwatch"));
}

#[test]
fn test_help() {
    batw_command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("batw [OPTIONS]"))
        .stdout(predicate::str::contains("--adapter_voltage"));
}

#[test]
fn test_invalid_arg() {
    batw_command().arg("--obviously_fake_flag").assert().failure();
}

#[test]
fn test_conflicting_temperature_units() {
    batw_command()
        .args(["-c", "-f"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_invalid_rate() {
    batw_command()
        .args(["-C", "./tests/valid_configs/empty_config.toml", "-r", "fast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid time value"));
}

#[test]
fn test_invalid_adapter_voltage_arg() {
    batw_command()
        .args([
            "-C",
            "./tests/valid_configs/empty_config.toml",
            "--adapter_voltage",
            "7V",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid adapter voltage"));
}
