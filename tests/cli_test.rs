//! End-to-end runs of the binary

mod common;

use assert_cmd::Command;
use common::{write_csv, SAMPLE_CSV};
use predicates::prelude::*;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Binary isolated from any config file or environment on this machine
fn command(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("release-dashboard").unwrap();
    cmd.current_dir(workdir)
        .env("HOME", workdir)
        .env("XDG_CONFIG_HOME", workdir.join("config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("LOG_LEVEL")
        .env_remove("LOG_OUTPUT")
        .env_remove("RELEASE_DASHBOARD_SOURCE")
        .env_remove("RELEASE_DASHBOARD_PAGE_SIZE")
        .env_remove("RELEASE_DASHBOARD_JSON_PRETTY");
    cmd
}

fn workspace() -> (TempDir, String) {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "releases.csv", SAMPLE_CSV);
    let source = path.to_string_lossy().into_owned();
    (dir, source)
}

#[test]
fn test_summary_json() {
    let (dir, source) = workspace();
    let output = command(dir.path())
        .args(["summary", "--json", "--source", &source])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["kpis"]["totalReleases"], 4);
    assert_eq!(json["summary"]["kpis"]["avgWorkingDays"], "5.3");
    assert_eq!(json["summary"]["stability"]["prerelease"], 1);
    assert_eq!(json["summary"]["durationRanking"][0]["repo"], "app");
}

#[test]
fn test_summary_with_filters() {
    let (dir, source) = workspace();
    let output = command(dir.path())
        .args([
            "summary",
            "--json",
            "--source",
            &source,
            "--repo",
            "lib",
            "--change-type",
            "patch",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["kpis"]["totalReleases"], 1);
    assert_eq!(json["filters"]["repositories"][0], "lib");
}

#[test]
fn test_table_pages() {
    let (dir, source) = workspace();
    let output = command(dir.path())
        .args([
            "table",
            "--json",
            "--source",
            &source,
            "--page-size",
            "3",
            "--page",
            "9",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // Requested page is clamped to the last one
    assert_eq!(json["page"], 2);
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["totalRows"], 4);
    assert_eq!(json["rows"][0]["recordId"], 1);
}

#[test]
fn test_table_text_output() {
    let (dir, source) = workspace();
    command(dir.path())
        .args(["table", "--source", &source, "--author", "park"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lib-util"))
        .stdout(predicate::str::contains("page 1 of 1"));
}

#[test]
fn test_missing_source_fails() {
    let dir = tempdir().unwrap();
    command(dir.path())
        .args(["summary", "--source", "nowhere.csv"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_missing_source_json_error() {
    let dir = tempdir().unwrap();
    let output = command(dir.path())
        .args(["summary", "--json", "--source", "nowhere.csv"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["error"].as_str().unwrap().contains("I/O error"));
}

#[test]
fn test_unknown_change_type_is_rejected() {
    let (dir, source) = workspace();
    command(dir.path())
        .args(["summary", "--source", &source, "--change-type", "huge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown change type"));
}

#[test]
fn test_unknown_command_is_rejected() {
    let dir = tempdir().unwrap();
    command(dir.path())
        .arg("charts")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
