//! Integration tests for the okrbox CLI

use assert_cmd::cargo;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const NOW: &str = "2026-01-13T12:00:00Z";

/// Task A runs 2026-01-05..2026-01-15 at 50%; task B has no plan.
const TASKS: &str = r#"[
  {"title": "A", "planStart": 1767571200000, "planEnd": 1768435200000, "progress": 0.5},
  {"title": "B", "progress": 80}
]"#;

/// A home directory with a UTC calendar configured.
fn home() -> TempDir {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config").join("okrbox");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[calendar]\nutc_offset_minutes = 0\n",
    )
    .unwrap();
    home
}

/// Get a Command for the okrbox binary, isolated to `home`
fn okrbox(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("okrbox"));
    cmd.env("HOME", home.path())
        .env_remove("OKRBOX_ENV")
        .env_remove("RUST_LOG");
    cmd
}

fn write_tasks(home: &TempDir) -> PathBuf {
    let path = home.path().join("tasks.json");
    std::fs::write(&path, TASKS).unwrap();
    path
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_help() {
    let home = home();
    okrbox(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("okrbox CLI"));
}

#[test]
fn test_score_task_keeps_unscoreable_slots() {
    let home = home();
    let file = write_tasks(&home);
    let scores = stdout_json(okrbox(&home).args(["score", "task", "--now", NOW, "--file"]).arg(&file));
    assert_eq!(scores[0]["score"], 70);
    assert!(scores[1].is_null());
}

#[test]
fn test_score_window_accepts_epoch_ms() {
    let home = home();
    let file = write_tasks(&home);
    // 2026-01-13T12:00:00Z
    let rollup = stdout_json(
        okrbox(&home)
            .args(["score", "window", "month", "--now", "1768305600000", "--file"])
            .arg(&file),
    );
    assert_eq!(rollup["window"], "month");
    assert_eq!(rollup["score"], 70);
    assert_eq!(rollup["reasons"][0], "《A》落后 30%（时间 80%，实际 50%）");
}

#[test]
fn test_score_report() {
    let home = home();
    let file = write_tasks(&home);
    let report = stdout_json(okrbox(&home).args(["score", "report", "--now", NOW, "--file"]).arg(&file));
    assert_eq!(report["week"]["score"], 70);
    assert_eq!(report["quarter"]["score"], 70);
    assert_eq!(report["lagging"].as_array().unwrap().len(), 1);
}

#[test]
fn test_score_lagging() {
    let home = home();
    let file = write_tasks(&home);
    okrbox(&home)
        .args(["score", "lagging", "--now", NOW, "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("《A》落后 30%"));
}

#[test]
fn test_invalid_now_fails() {
    let home = home();
    let file = write_tasks(&home);
    okrbox(&home)
        .args(["score", "report", "--now", "yesterday", "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_unknown_window_fails() {
    let home = home();
    let file = write_tasks(&home);
    okrbox(&home)
        .args(["score", "window", "decade", "--file"])
        .arg(&file)
        .assert()
        .failure();
}

#[test]
fn test_missing_snapshot_fails() {
    let home = home();
    okrbox(&home)
        .args(["drift", "--file", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.json"));
}

#[test]
fn test_demo_then_drift_and_today() {
    let home = home();
    let plan = home.path().join("plan.json");
    okrbox(&home)
        .args(["demo", "--now", NOW, "--out"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("demo snapshot written"));

    let drift = stdout_json(okrbox(&home).args(["drift", "--now", NOW, "--file"]).arg(&plan));
    assert_eq!(drift["driftCount"], 1);
    assert_eq!(drift["unalignedActions"], 0);

    let today = stdout_json(okrbox(&home).args(["today", "--file"]).arg(&plan));
    assert!(today["today"].as_array().unwrap().is_empty());
    assert_eq!(today["backlog"].as_array().unwrap().len(), 6);
}

#[test]
fn test_demo_prints_snapshot_without_out() {
    let home = home();
    let snapshot = stdout_json(okrbox(&home).args(["demo", "--now", NOW]));
    assert_eq!(snapshot["keyResults"].as_array().unwrap().len(), 3);
}

#[test]
fn test_action_workflow_rewrites_snapshot() {
    let home = home();
    let plan = home.path().join("plan.json");
    okrbox(&home).args(["demo", "--now", NOW, "--out"]).arg(&plan).assert().success();
    let id = read_json(&plan)["actions"][0]["id"].as_str().unwrap().to_string();

    okrbox(&home)
        .args(["action", "move", &id, "Today", "--file"])
        .arg(&plan)
        .assert()
        .success();
    let today = stdout_json(okrbox(&home).args(["today", "--file"]).arg(&plan));
    assert_eq!(today["today"][0]["id"], id.as_str());
    assert_eq!(today["totalMinutes"], 90.0);

    okrbox(&home)
        .args(["action", "complete", &id, "--failure", "no budget", "--now", NOW, "--file"])
        .arg(&plan)
        .assert()
        .success();
    let saved = read_json(&plan);
    assert_eq!(saved["actions"][0]["status"], "Done");
    assert_eq!(saved["evidence"].as_array().unwrap().len(), 3);
}

#[test]
fn test_action_complete_requires_outcome() {
    let home = home();
    let plan = home.path().join("plan.json");
    okrbox(&home).args(["demo", "--out"]).arg(&plan).assert().success();
    okrbox(&home)
        .args(["action", "complete", "some-id", "--file"])
        .arg(&plan)
        .assert()
        .failure();
}

#[test]
fn test_move_unknown_action_fails() {
    let home = home();
    let plan = home.path().join("plan.json");
    okrbox(&home).args(["demo", "--out"]).arg(&plan).assert().success();
    okrbox(&home)
        .args(["action", "move", "missing", "Today", "--file"])
        .arg(&plan)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing"));
}

#[test]
fn test_evidence_add_and_list() {
    let home = home();
    let plan = home.path().join("plan.json");
    okrbox(&home).args(["demo", "--now", NOW, "--out"]).arg(&plan).assert().success();
    let snapshot = read_json(&plan);
    let action_id = snapshot["actions"][1]["id"].as_str().unwrap().to_string();
    let kr_id = snapshot["actions"][1]["keyResultIds"][0].clone();

    let recorded = stdout_json(
        okrbox(&home)
            .args(["evidence", "add", "--action", &action_id, "--title", "memo", "--now", NOW, "--file"])
            .arg(&plan),
    );
    assert_eq!(recorded["type"], "Note");
    assert_eq!(recorded["keyResultIds"][0], kr_id);

    let feed = stdout_json(okrbox(&home).args(["evidence", "list", "--file"]).arg(&plan));
    assert_eq!(feed.as_array().unwrap().len(), 3);
}

#[test]
fn test_bank_filters_by_kr() {
    let home = home();
    let plan = home.path().join("plan.json");
    okrbox(&home).args(["demo", "--now", NOW, "--out"]).arg(&plan).assert().success();
    let kr_id = read_json(&plan)["keyResults"][0]["id"].as_str().unwrap().to_string();

    let bank = stdout_json(okrbox(&home).args(["bank", "--kr", &kr_id, "--file"]).arg(&plan));
    assert_eq!(bank.as_array().unwrap().len(), 2);
    assert!(bank[0]["planWeek"].as_str().unwrap().starts_with('第'));
}

#[test]
fn test_config_set_get_list() {
    let home = home();
    okrbox(&home)
        .args(["config", "set", "scoring.reason_limit", "3"])
        .assert()
        .success()
        .stdout("ok\n");
    okrbox(&home)
        .args(["config", "get", "scoring.reason_limit"])
        .assert()
        .success()
        .stdout("3\n");
    okrbox(&home)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("calendar.utc_offset_minutes = 0"))
        .stdout(predicate::str::contains("log.level = info"));
}

#[test]
fn test_config_rejects_bad_values() {
    let home = home();
    okrbox(&home)
        .args(["config", "set", "scoring.nope", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key"));
    okrbox(&home)
        .args(["config", "set", "drift.top_limit", "0"])
        .assert()
        .failure();
    okrbox(&home)
        .args(["config", "get", "scoring.nope"])
        .assert()
        .failure();
}

#[test]
fn test_config_reset() {
    let home = home();
    okrbox(&home).args(["config", "reset"]).assert().success();
    okrbox(&home)
        .args(["config", "get", "calendar.utc_offset_minutes"])
        .assert()
        .success()
        .stdout("none\n");
}

#[test]
fn test_completions() {
    let home = home();
    okrbox(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("okrbox"));
}

#[test]
fn test_idea_add_and_list() {
    let home = home();
    let plan = home.path().join("plan.json");
    okrbox(&home).args(["demo", "--now", NOW, "--out"]).arg(&plan).assert().success();
    let kr_id = read_json(&plan)["keyResults"][0]["id"].as_str().unwrap().to_string();

    let parked = stdout_json(
        okrbox(&home)
            .args(["idea", "add", "--title", "Creator fund", "--minutes", "240", "--kr", &kr_id, "--file"])
            .arg(&plan),
    );
    assert_eq!(parked["status"], "Parking");

    let ideas = stdout_json(okrbox(&home).args(["idea", "list", "--file"]).arg(&plan));
    let ideas = ideas.as_array().unwrap();
    assert_eq!(ideas.len(), 2);
    assert_eq!(ideas[1]["title"], "Creator fund");
    assert_eq!(ideas[1]["minutes"], 240.0);
    assert!(ideas[1]["krTitle"].is_string());
}

#[test]
fn test_action_create_enforces_guardrail() {
    let home = home();
    let plan = home.path().join("plan.json");
    okrbox(&home).args(["demo", "--now", NOW, "--out"]).arg(&plan).assert().success();
    let kr_id = read_json(&plan)["keyResults"][0]["id"].as_str().unwrap().to_string();

    okrbox(&home)
        .args(["action", "create", "--title", "Rewrite ranking", "--minutes", "45", "--file"])
        .arg(&plan)
        .assert()
        .failure()
        .stderr(predicate::str::contains("need a key result"));
    assert_eq!(read_json(&plan)["actions"].as_array().unwrap().len(), 6);

    let created = stdout_json(
        okrbox(&home)
            .args(["action", "create", "--title", "Rewrite ranking", "--minutes", "45", "--kr", &kr_id, "--file"])
            .arg(&plan),
    );
    assert_eq!(created["status"], "Backlog");
    assert_eq!(created["keyResultIds"][0], kr_id.as_str());

    okrbox(&home)
        .args(["action", "create", "--title", "Reply to mail", "--minutes", "15", "--file"])
        .arg(&plan)
        .assert()
        .success();
    assert_eq!(read_json(&plan)["actions"].as_array().unwrap().len(), 8);
}

#[test]
fn test_invalid_config_is_reported() {
    let home = home();
    std::fs::write(
        home.path().join(".config").join("okrbox").join("config.toml"),
        "[scoring]\nreason_limit = 0\n",
    )
    .unwrap();
    let file = write_tasks(&home);
    okrbox(&home)
        .args(["score", "window", "week", "--now", NOW, "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be at least 1"));
}
