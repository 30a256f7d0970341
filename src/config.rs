//! Configuration system for the persona engine
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (PERSONA_ENGINE_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::trainer::{OverflowPolicy, MAX_SAMPLE_CAPACITY};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "PERSONA_ENGINE_";

/// Main engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scorer and trainer tuning
    pub engine: EngineSettings,

    /// Where engine state is kept between runs
    pub storage: StorageSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Scorer and trainer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Seed for the initial parameter jitter
    pub seed: u64,

    /// Amplitude of the uniform jitter added to the prior (0 = none)
    pub init_jitter: f32,

    /// Output-layer learning rate
    pub learning_rate: f32,

    /// Maximum number of stored feedback samples
    pub sample_capacity: usize,

    /// What to do when the sample buffer is full
    pub overflow_policy: OverflowPolicy,

    /// Feedback at or above this satisfaction counts as a successful recommendation
    pub success_threshold: f32,
}

/// Storage path settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Engine state file (parameters, samples, statistics)
    pub state_file: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

// Default implementations

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            init_jitter: 0.01,
            learning_rate: 0.05,
            sample_capacity: 256,
            overflow_policy: OverflowPolicy::Reject,
            success_threshold: 0.7,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            state_file: "~/.persona-engine/state.json".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            config = Self::from_file(&path)?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration file without overrides or validation
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            message: format!("{}: {}", path.display(), e.message()),
            source: Some(e),
        })
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::ConfigNotFound { path });
        }

        for path in search_paths() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok());
    }

    /// Apply overrides from any key lookup; keys omit the prefix
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Engine settings
        if let Some(n) = lookup("SEED").and_then(|v| v.parse().ok()) {
            self.engine.seed = n;
        }
        if let Some(n) = lookup("INIT_JITTER").and_then(|v| v.parse().ok()) {
            self.engine.init_jitter = n;
        }
        if let Some(n) = lookup("LEARNING_RATE").and_then(|v| v.parse().ok()) {
            self.engine.learning_rate = n;
        }
        if let Some(n) = lookup("SAMPLE_CAPACITY").and_then(|v| v.parse().ok()) {
            self.engine.sample_capacity = n;
        }
        if let Some(policy) = lookup("OVERFLOW_POLICY").and_then(|v| v.parse().ok()) {
            self.engine.overflow_policy = policy;
        }
        if let Some(n) = lookup("SUCCESS_THRESHOLD").and_then(|v| v.parse().ok()) {
            self.engine.success_threshold = n;
        }

        // Storage settings
        if let Some(val) = lookup("STATE_FILE") {
            self.storage.state_file = val;
        }

        // Logging settings
        if let Some(val) = lookup("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Some(val) = lookup("LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        self.storage.state_file = expand_path(&self.storage.state_file);

        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let engine = &self.engine;

        if !(engine.learning_rate > 0.0 && engine.learning_rate <= 1.0) {
            return Err(Error::config_field_invalid(
                "engine.learning_rate",
                format!("learning_rate must be in (0, 1], got {}", engine.learning_rate),
            ));
        }

        if !(0.0..=0.1).contains(&engine.init_jitter) {
            return Err(Error::config_field_invalid(
                "engine.init_jitter",
                format!("init_jitter must be in [0, 0.1], got {}", engine.init_jitter),
            ));
        }

        if !(1..=MAX_SAMPLE_CAPACITY).contains(&engine.sample_capacity) {
            return Err(Error::config_field_invalid(
                "engine.sample_capacity",
                format!(
                    "sample_capacity must be in [1, {}], got {}",
                    MAX_SAMPLE_CAPACITY, engine.sample_capacity
                ),
            ));
        }

        if !(0.0..=1.0).contains(&engine.success_threshold) {
            return Err(Error::config_field_invalid(
                "engine.success_threshold",
                format!(
                    "success_threshold must be in [0, 1], got {}",
                    engine.success_threshold
                ),
            ));
        }

        if self.storage.state_file.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "storage.state_file",
                "state_file cannot be empty",
            ));
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Get the state file as a PathBuf
    pub fn state_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.state_file)
    }
}

/// Standard configuration file locations, in search order
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("persona-engine.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("persona-engine").join("config.toml"));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".persona-engine").join("config.toml"));
    }
    paths.push(PathBuf::from("/etc/persona-engine/config.toml"));
    paths
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Default location for a new configuration file
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".persona-engine")
        .join("config.toml")
}

/// Initialize a new configuration file, returning where it was written
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(default_config_path);

    // Check if file exists
    if config_path.exists() && !force {
        return Err(Error::config_validation(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# Persona Engine Configuration

[engine]
# Seed for the initial parameter jitter; same seed, same engine
seed = 24301

# Amplitude of the uniform jitter added to the capability prior (0 to 0.1)
init_jitter = 0.01

# Output-layer learning rate, in (0, 1]
learning_rate = 0.05

# Maximum number of stored feedback samples (1 to 65536)
sample_capacity = 256

# When the sample buffer is full: "reject" or "evict-oldest"
overflow_policy = "reject"

# Feedback at or above this satisfaction counts as a successful recommendation
success_threshold = 0.7

[storage]
# Engine state file (learned parameters, samples, statistics)
state_file = "~/.persona-engine/state.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.persona-engine/logs/engine.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
    .to_string()
}
