//! Error types for the persona engine
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI
//!
//! Every engine error is recoverable: nothing here aborts the process on its own.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Input errors (3xx)
    InvalidInput = 300,

    // Training errors (4xx)
    BufferFull = 400,
    NoTrainingData = 401,

    // State persistence errors (5xx)
    StateCorrupted = 500,
    StateVersion = 501,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E300")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10,
            200..=299 => 20,
            300..=399 => 30,
            400..=499 => 40,
            500..=599 => 50,
            900..=999 => 90,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the engine and its CLI
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Engine Errors
    // ─────────────────────────────────────────────────────────────

    /// Malformed or missing feature data
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Feedback sample storage exhausted
    #[error("Training buffer full: {capacity} samples stored")]
    BufferFull { capacity: usize },

    /// Training requested with an empty sample buffer
    #[error("No training data: record feedback before training")]
    NoTrainingData,

    // ─────────────────────────────────────────────────────────────
    // State Errors
    // ─────────────────────────────────────────────────────────────

    /// Saved engine state could not be decoded
    #[error("Engine state at {path} is corrupted: {message}")]
    StateCorrupted { path: PathBuf, message: String },

    /// Saved engine state has an unknown format version
    #[error("Engine state format version {found} is not supported (expected {expected})")]
    StateVersion { found: u32, expected: u32 },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { source, .. } => io_code(source, ErrorCode::IoRead),
            Error::IoWrite { source, .. } => io_code(source, ErrorCode::IoWrite),
            Error::Toml(_) => ErrorCode::ConfigParseError,

            Error::InvalidInput { .. } => ErrorCode::InvalidInput,
            Error::BufferFull { .. } => ErrorCode::BufferFull,
            Error::NoTrainingData => ErrorCode::NoTrainingData,

            Error::StateCorrupted { .. } => ErrorCode::StateCorrupted,
            Error::StateVersion { .. } => ErrorCode::StateVersion,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Check if the caller can recover by adjusting input or waiting
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput { .. } | Error::BufferFull { .. } | Error::NoTrainingData
        )
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'persona-engine config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'persona-engine config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the [engine] section; learning_rate must be in (0, 1] and sample_capacity in [1, 65536]."
            ),
            Error::InvalidInput { .. } => Some(
                "Supply defaults for unknown hardware fields instead of leaving them malformed."
            ),
            Error::BufferFull { .. } => Some(
                "Run 'persona-engine train' and 'persona-engine reset', or set overflow_policy = \"evict-oldest\"."
            ),
            Error::NoTrainingData => Some(
                "Record outcomes with 'persona-engine feedback' before training."
            ),
            Error::StateCorrupted { .. } => Some(
                "Delete the state file or run 'persona-engine reset' to start from fresh parameters."
            ),
            Error::StateVersion { .. } => Some(
                "The state file was written by a different engine version. Run 'persona-engine reset'."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            code.as_str(),
            self
        );

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

/// Missing files and permission problems get their own codes
fn io_code(source: &std::io::Error, fallback: ErrorCode) -> ErrorCode {
    match source.kind() {
        std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
        std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
        _ => fallback,
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a state corrupted error
    pub fn state_corrupted(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::StateCorrupted {
            path: path.into(),
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
