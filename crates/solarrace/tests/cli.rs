use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../solarrace-parser/tests/data")
        .join(name)
}

fn solarrace() -> Command {
    let mut cmd = Command::cargo_bin("solarrace").expect("binary built");
    cmd.env_remove("SOLARRACE_INPUT")
        .env_remove("SOLARRACE_OUT_ROOT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn build_writes_timelines() {
    let out = tempfile::tempdir().expect("tempdir");

    solarrace()
        .current_dir(out.path())
        .arg("build")
        .arg("--input")
        .arg(fixture("alldata-sample.csv"))
        .arg("--out-root")
        .arg(out.path().join("public"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 4 teams (5 points)"));

    let index = std::fs::read_to_string(out.path().join("public/teams/index.json"))
        .expect("index written");
    let index: serde_json::Value = serde_json::from_str(&index).expect("json");
    assert_eq!(index["TDSR"]["count"], 2);
    assert!(out.path().join("public/teams/BOC/timeseries.json").exists());
}

#[test]
fn default_command_reads_env_paths() {
    let out = tempfile::tempdir().expect("tempdir");

    solarrace()
        .current_dir(out.path())
        .env("SOLARRACE_INPUT", fixture("alldata-sample.csv"))
        .env("SOLARRACE_OUT_ROOT", out.path().join("site"))
        .assert()
        .success();

    assert!(out.path().join("site/teams/index.json").exists());
}

#[test]
fn missing_longitude_fails_without_output() {
    let out = tempfile::tempdir().expect("tempdir");

    solarrace()
        .current_dir(out.path())
        .arg("build")
        .arg("--input")
        .arg(fixture("missing-longitude.csv"))
        .arg("--out-root")
        .arg(out.path().join("public"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required columns"));

    assert!(!out.path().join("public").exists());
}

#[test]
fn teams_lists_grouped_keys() {
    let out = tempfile::tempdir().expect("tempdir");

    solarrace()
        .current_dir(out.path())
        .arg("teams")
        .arg("--input")
        .arg(fixture("alldata-sample.csv"))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("TDSR")
                .and(predicate::str::contains("BOC"))
                .and(predicate::str::contains("4 teams, 5 points, 4 rows skipped")),
        );

    assert!(!out.path().join("public").exists());
}
