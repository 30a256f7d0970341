//! CLI integration tests
//!
//! Tests the command-line interface using assert_cmd. Every test runs in its
//! own sandbox directory with an explicit config and state file.

mod common;

use predicates::prelude::*;

use common::{engine_cmd, fixture_path, Sandbox};

// ─────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    engine_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("recommend"))
        .stdout(predicate::str::contains("feedback"))
        .stdout(predicate::str::contains("train"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_command() {
    engine_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("persona-engine"))
        .stdout(predicate::str::contains("Git Hash"))
        .stdout(predicate::str::contains("Target"));
}

#[test]
fn test_personas_command() {
    engine_cmd()
        .arg("personas")
        .assert()
        .success()
        .stdout(predicate::str::contains("calculator"))
        .stdout(predicate::str::contains("workstation"))
        .stdout(predicate::str::contains("quantum"));
}

// ─────────────────────────────────────────────────────────────────
// Recommend Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_recommend_from_flags() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["recommend", "--memory-kb", "1", "--arch", "x86", "--word-width", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommended persona: Calculator"));

    assert!(sandbox.state_path().exists());
}

#[test]
fn test_recommend_bare_large_box() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["recommend", "--memory-kb", "1048576", "--cores", "8", "--arch", "x86"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommended persona: Workstation"));
}

#[test]
fn test_recommend_from_probe_file() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("recommend")
        .arg("--probe")
        .arg(fixture_path("probe_workstation.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Workstation"));
}

#[test]
fn test_recommend_with_preference() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["recommend", "--memory-kb", "4", "--prefer", "server"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Server (100% confidence, preference)"));
}

#[test]
fn test_recommend_specialized_pair() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args([
            "recommend",
            "--memory-kb",
            "1048576",
            "--quantum-coprocessor",
            "--cryo-controller",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quantum (95% confidence"));
}

#[test]
fn test_recommend_json() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .cmd()
        .args(["recommend", "--memory-kb", "1", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["persona"], "calculator");
    assert!(value["confidence"].as_f64().is_some());
}

#[test]
fn test_recommend_unknown_preference_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["recommend", "--memory-kb", "1", "--prefer", "toaster"])
        .assert()
        .failure()
        .code(30)
        .stderr(predicate::str::contains("E300"));
}

#[test]
fn test_recommend_host_probe() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("recommend")
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommended persona:"));
}

// ─────────────────────────────────────────────────────────────────
// Feedback, Train and Stats Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_feedback_without_recommendation_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["feedback", "--satisfaction", "0.9"])
        .assert()
        .failure()
        .code(30)
        .stderr(predicate::str::contains("no recommendation recorded"));
}

#[test]
fn test_train_without_feedback_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("train")
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("No training data"));
}

#[test]
fn test_feedback_loop_persists() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["recommend", "--memory-kb", "1", "--word-width", "8"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["feedback", "--satisfaction", "0.9", "--performance", "12", "--train", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Feedback recorded for Calculator"))
        .stdout(predicate::str::contains("Trained 3 epochs"));

    sandbox
        .cmd()
        .args(["train", "--epochs", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 epochs total"));

    sandbox
        .cmd()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommendations:  1"))
        .stdout(predicate::str::contains("Successful:       1"))
        .stdout(predicate::str::contains("Training samples: 1"))
        .stdout(predicate::str::contains("Trained epochs:   5"));
}

#[test]
fn test_feedback_rejects_out_of_range() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["recommend", "--memory-kb", "1"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["feedback", "--satisfaction", "1.5"])
        .assert()
        .failure()
        .code(30);
}

#[test]
fn test_stats_json() {
    let sandbox = Sandbox::new();
    let output = sandbox.cmd().args(["stats", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["total_recommendations"], 0);
    assert!(value["last"].is_null());
}

#[test]
fn test_reset_clears_state() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["recommend", "--memory-kb", "1"])
        .assert()
        .success();

    sandbox
        .cmd()
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Engine state reset"));

    sandbox
        .cmd()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommendations:  0"));
}

#[test]
fn test_corrupted_state_reports_error() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.state_path(), "not json").unwrap();

    sandbox
        .cmd()
        .arg("stats")
        .assert()
        .failure()
        .code(50)
        .stderr(predicate::str::contains("E500"))
        .stderr(predicate::str::contains("Hint"));
}

// ─────────────────────────────────────────────────────────────────
// Config Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_show() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[engine]"))
        .stdout(predicate::str::contains("[storage]"))
        .stdout(predicate::str::contains("[logging]"))
        .stdout(predicate::str::contains("evict-oldest"));
}

#[test]
fn test_config_validate_fixture() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_validate_invalid() {
    engine_cmd()
        .arg("--config")
        .arg(common::invalid_config_fixture())
        .args(["config", "validate"])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("learning_rate"));
}

#[test]
fn test_config_missing_file() {
    engine_cmd()
        .args(["--config", "/nonexistent/persona-engine.toml", "config", "validate"])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("E100"));
}

#[test]
fn test_config_init() {
    let sandbox = Sandbox::new();
    let target = sandbox.dir.path().join("fresh").join("config.toml");

    engine_cmd()
        .args(["config", "init", "--path"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));
    assert!(target.exists());

    // Refuses to overwrite without --force
    engine_cmd()
        .args(["config", "init", "--path"])
        .arg(&target)
        .assert()
        .failure();

    engine_cmd()
        .args(["config", "init", "--force", "--path"])
        .arg(&target)
        .assert()
        .success();
}
