#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pipesim(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pipesim").unwrap();
    cmd.current_dir(dir.path())
        .env("PIPESIM_CONFIG", dir.path().join("pipesim.yaml"))
        .env_remove("PIPESIM_SEED")
        .env_remove("RUST_LOG");
    cmd
}

fn simulate_json(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = pipesim(dir)
        .arg("simulate")
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// pipesim simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_prints_snapshot() {
    let dir = TempDir::new().unwrap();
    let snap = simulate_json(&dir, &["--ticks", "5", "--seed", "7"]);
    for key in [
        "commits",
        "pull_requests",
        "deployments",
        "issues",
        "incidents",
        "time_entries",
    ] {
        assert!(snap[key].is_array(), "missing {key}");
    }
    assert!(!snap["commits"].as_array().unwrap().is_empty());
}

#[test]
fn simulate_with_seed_is_reproducible_in_structure() {
    let dir = TempDir::new().unwrap();
    let a = simulate_json(&dir, &["--ticks", "8", "--seed", "3"]);
    let b = simulate_json(&dir, &["--ticks", "8", "--seed", "3"]);
    assert_eq!(a["commits"], b["commits"]);
    assert_eq!(a["pull_requests"], b["pull_requests"]);
    assert_eq!(a["deployments"], b["deployments"]);
}

#[test]
fn simulate_with_incident_completes_nothing() {
    let dir = TempDir::new().unwrap();
    let snap = simulate_json(&dir, &["--ticks", "30", "--seed", "5", "--incident"]);
    let deployments = snap["deployments"].as_array().unwrap();
    assert!(!deployments.is_empty());
    for d in deployments {
        assert_eq!(d["status"], "queued");
    }
    assert_eq!(snap["incidents"].as_array().unwrap().len(), 1);
}

#[test]
fn simulate_writes_out_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out/snapshot.json");
    pipesim(&dir)
        .args(["simulate", "--ticks", "2", "--seed", "1", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote"));

    let data = std::fs::read_to_string(&out).unwrap();
    let snap: serde_json::Value = serde_json::from_str(&data).unwrap();
    assert!(snap["commits"].is_array());
}

#[test]
fn simulate_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("pipesim.yaml"),
        "deployment_success_percent: 150\n",
    )
    .unwrap();
    pipesim(&dir)
        .args(["simulate", "--ticks", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("deployment_success_percent"));
}

// ---------------------------------------------------------------------------
// pipesim config
// ---------------------------------------------------------------------------

#[test]
fn config_init_writes_defaults_once() {
    let dir = TempDir::new().unwrap();
    pipesim(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    let path = dir.path().join("pipesim.yaml");
    let data = std::fs::read_to_string(&path).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&data).unwrap();
    assert_eq!(value["tick_interval_ms"].as_u64(), Some(5000));

    std::fs::write(&path, "tick_interval_ms: 42\n").unwrap();
    pipesim(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "tick_interval_ms: 42\n");
}

#[test]
fn config_init_honors_path_flag() {
    let dir = TempDir::new().unwrap();
    let custom = dir.path().join("custom.yaml");
    pipesim(&dir)
        .args(["config", "init", "--path"])
        .arg(&custom)
        .assert()
        .success();
    assert!(custom.exists());
    assert!(!dir.path().join("pipesim.yaml").exists());
}

#[test]
fn config_show_json_reports_defaults() {
    let dir = TempDir::new().unwrap();
    let output = pipesim(&dir)
        .args(["config", "show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["deployment_success_percent"], 90);
    assert_eq!(value["unassigned_issue_percent"], 30);
}

#[test]
fn config_validate_fails_on_zero_interval() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("pipesim.yaml"), "tick_interval_ms: 0\n").unwrap();
    pipesim(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// ---------------------------------------------------------------------------
// pipesim issues
// ---------------------------------------------------------------------------

#[test]
fn issues_against_unreachable_server_fails() {
    let dir = TempDir::new().unwrap();
    pipesim(&dir)
        .args(["issues", "--url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}
