//! Configuration system tests
//!
//! Tests configuration loading and validation through the public API.

mod common;

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use persona_engine::config::{init_config, EngineConfig, EngineSettings};
use persona_engine::engine::PersonaEngine;
use persona_engine::error::{Error, ErrorCode};
use persona_engine::trainer::{OverflowPolicy, MAX_SAMPLE_CAPACITY};

/// Test fixture for configuration testing
struct ConfigFixture {
    _temp_dir: TempDir,
    config_path: PathBuf,
}

impl ConfigFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        Self {
            _temp_dir: temp_dir,
            config_path,
        }
    }

    fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).unwrap();
    }

    fn path(&self) -> &str {
        self.config_path.to_str().unwrap()
    }
}

// ─────────────────────────────────────────────────────────────────
// Valid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_valid_fixture_loads() {
    let config = EngineConfig::from_file(&common::valid_config_fixture()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.engine.seed, 7);
    assert_eq!(config.engine.init_jitter, 0.0);
    assert_eq!(config.engine.sample_capacity, 8);
    assert_eq!(config.engine.overflow_policy, OverflowPolicy::EvictOldest);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_empty_config_uses_defaults() {
    let fixture = ConfigFixture::new();
    fixture.write_config("");

    let config = EngineConfig::from_file(&fixture.config_path).unwrap();
    assert_eq!(config.engine, EngineSettings::default());
    assert!(config.logging.file.is_none());
}

#[test]
fn test_partial_section() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[engine]
learning_rate = 0.3
"#,
    );

    let config = EngineConfig::from_file(&fixture.config_path).unwrap();
    assert_eq!(config.engine.learning_rate, 0.3);
    assert_eq!(config.engine.sample_capacity, 256);
    assert_eq!(config.engine.success_threshold, 0.7);
}

#[test]
fn test_load_expands_state_path() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[storage]
state_file = "~/persona-test/state.json"
"#,
    );

    let config = EngineConfig::load(Some(fixture.path())).unwrap();
    assert!(!config.storage.state_file.contains('~'));
    assert!(config.state_path().ends_with("persona-test/state.json"));
}

// ─────────────────────────────────────────────────────────────────
// Invalid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_fixture_rejected() {
    let err = EngineConfig::load(Some(common::invalid_config_fixture().to_str().unwrap()))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigValidation);
}

#[test]
fn test_malformed_toml() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[engine\nseed = ");

    let err = EngineConfig::load(Some(fixture.path())).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigParseError);
    assert!(err.suggestion().is_some());
}

#[test]
fn test_unknown_overflow_policy() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[engine]
overflow_policy = "drop-newest"
"#,
    );

    let err = EngineConfig::load(Some(fixture.path())).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }));
}

#[test]
fn test_success_threshold_out_of_range() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[engine]
success_threshold = 1.5
"#,
    );

    let err = EngineConfig::load(Some(fixture.path())).unwrap_err();
    match err {
        Error::ConfigValidation { field, .. } => {
            assert_eq!(field.as_deref(), Some("engine.success_threshold"));
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[test]
fn test_oversized_sample_capacity_rejected() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[engine]
sample_capacity = 100000000000000
"#,
    );

    let err = EngineConfig::load(Some(fixture.path())).unwrap_err();
    match err {
        Error::ConfigValidation { field, .. } => {
            assert_eq!(field.as_deref(), Some("engine.sample_capacity"));
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[test]
fn test_sample_capacity_upper_bound_accepted() {
    let fixture = ConfigFixture::new();
    fixture.write_config(&format!("[engine]\nsample_capacity = {}\n", MAX_SAMPLE_CAPACITY));

    let config = EngineConfig::load(Some(fixture.path())).unwrap();
    assert_eq!(config.engine.sample_capacity, MAX_SAMPLE_CAPACITY);
    let engine = PersonaEngine::initialize(&config.engine);
    assert_eq!(engine.trainer().capacity(), MAX_SAMPLE_CAPACITY);
}

#[test]
fn test_explicit_missing_file() {
    let err = EngineConfig::load(Some("/nonexistent/dir/config.toml")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigNotFound);
}

// ─────────────────────────────────────────────────────────────────
// Init Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_init_writes_loadable_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");
    let path_str = path.to_str().unwrap();

    let written = init_config(Some(path_str), false).unwrap();
    assert_eq!(written, path);

    let config = EngineConfig::load(Some(path_str)).unwrap();
    assert_eq!(config.engine, EngineSettings::default());

    assert!(init_config(Some(path_str), false).is_err());
    assert!(init_config(Some(path_str), true).is_ok());
}
