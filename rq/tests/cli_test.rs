//! End-to-end tests for the `rq` binary

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Fast durations so runs finish in a few milliseconds of real time
const FAST_CONFIG: &str = "scheduler:\n  max-queue-depth: 16\neffects:\n  color_grade: 8\n  blur: 6\n  trim: 2\n  speed_change: 4\n  transition: 3\n";

fn rq(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rq").expect("rq binary should build");
    cmd.env("XDG_DATA_HOME", home.path()).env("XDG_CONFIG_HOME", home.path());
    cmd.current_dir(home.path());
    cmd
}

fn write_config(home: &TempDir) -> std::path::PathBuf {
    let path = home.path().join("rq.yml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(FAST_CONFIG.as_bytes()).unwrap();
    path
}

#[test]
fn test_effects_lists_configured_durations() {
    let home = TempDir::new().unwrap();
    let config = write_config(&home);

    rq(&home)
        .args(["-c", config.to_str().unwrap(), "effects"])
        .assert()
        .success()
        .stdout(predicate::str::contains("color_grade"))
        .stdout(predicate::str::contains("8ms"));
}

#[test]
fn test_demo_json_reports_superseded_job() {
    let home = TempDir::new().unwrap();
    let config = write_config(&home);

    let output = rq(&home)
        .args(["-c", config.to_str().unwrap(), "demo", "--format", "json", "--speed", "50"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let stats = &report["stats"];
    assert_eq!(stats["done"], 3);
    assert_eq!(stats["cancelled"], 1);

    let history = report["history"].as_array().unwrap();
    assert_eq!(history.len(), 4);
    let blur = history.iter().find(|job| job["effect"] == "blur").unwrap();
    assert_eq!(blur["segment_id"], "seg_002");
    assert_eq!(blur["status"], "cancelled");
    assert!(blur.get("duration_ms").is_none());
}

#[test]
fn test_run_text_output() {
    let home = TempDir::new().unwrap();
    let config = write_config(&home);

    rq(&home)
        .args(["-c", config.to_str().unwrap(), "run", "seg_a:trim", "seg_b:blur:high"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seg_a"))
        .stdout(predicate::str::contains("Total jobs: 2"));
}

#[test]
fn test_run_rejects_unknown_effect() {
    let home = TempDir::new().unwrap();

    rq(&home)
        .args(["run", "seg_a:sharpen"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown effect"));
}

#[test]
fn test_missing_config_file_fails() {
    let home = TempDir::new().unwrap();

    rq(&home)
        .args(["-c", "/definitely/not/here.yml", "effects"])
        .assert()
        .failure();
}
