use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn doctor_reports_version() {
    let mut cmd = Command::cargo_bin("bmp-cli").unwrap();
    cmd.arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("bmp-cli"));
}

#[test]
fn run_without_config_fails_cleanly() {
    let mut cmd = Command::cargo_bin("bmp-cli").unwrap();
    cmd.args(["run", "--config", "/nonexistent/run.toml", "--out", "/tmp/bmp-cli-test-out"])
        .assert()
        .failure();
}
