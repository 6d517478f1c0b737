//! Error types for tasktrackr
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (blank title, unknown id, bad config)
//! - 3: Corrupt state (tasks file exists but cannot be parsed)
//! - 4: Operation failed (storage write/read, lock contention)

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tasktrackr CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const CORRUPT_STATE: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tasktrackr operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Task not found: {0}")]
    NotFound(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // Corrupt state (exit code 3)
    #[error("Corrupt task file {}: {source}", .path.display())]
    CorruptState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // Operation failures (exit code 4)
    #[error("Failed to persist {}: {source}", .path.display())]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidInput(_)
            | Error::NotFound(_)
            | Error::InvalidConfig(_)
            | Error::TomlParse(_) => exit_codes::USER_ERROR,

            Error::CorruptState { .. } => exit_codes::CORRUPT_STATE,

            Error::PersistenceFailure { .. }
            | Error::LockFailed(_)
            | Error::Io(_)
            | Error::Json(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Stable machine-readable label for this error
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::NotFound(_) => "not_found",
            Error::InvalidConfig(_) | Error::TomlParse(_) => "invalid_config",
            Error::CorruptState { .. } => "corrupt_state",
            Error::PersistenceFailure { .. } => "persistence_failure",
            Error::LockFailed(_) => "lock_failed",
            Error::Io(_) | Error::Json(_) => "operation_failed",
        }
    }

    /// Structured details for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::NotFound(id) => Some(serde_json::json!({ "id": id })),
            Error::CorruptState { path, source } => Some(serde_json::json!({
                "path": path.to_string_lossy(),
                "line": source.line(),
                "column": source.column(),
            })),
            Error::PersistenceFailure { path, .. } | Error::LockFailed(path) => {
                Some(serde_json::json!({ "path": path.to_string_lossy() }))
            }
            Error::InvalidInput(message) | Error::InvalidConfig(message) => {
                Some(serde_json::json!({ "message": message }))
            }
            _ => None,
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::PersistenceFailure {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for tasktrackr operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub kind: &'static str,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            kind: err.kind(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
