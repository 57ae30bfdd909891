//! Error types for pyzpack
//!
//! All modules use `PyzpackResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pyzpack operations
pub type PyzpackResult<T> = Result<T, PyzpackError>;

/// All errors that can occur in pyzpack
#[derive(Error, Debug)]
pub enum PyzpackError {
    // Input errors
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid path: {path}: {reason}")]
    PathInvalid { path: PathBuf, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // External tool errors
    #[error("Required tool not found: {name}. {hint}")]
    ToolNotFound { name: String, hint: String },

    #[error("Failed to run {command}")]
    ToolFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with status {code}")]
    ToolExit { command: String, code: i32 },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl PyzpackError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid-path error
    pub fn path_invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::PathInvalid {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a tool spawn error, mapping a missing binary to `ToolNotFound`
    pub fn tool_failed(
        name: &str,
        command: impl Into<String>,
        hint: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::ToolNotFound {
                name: name.to_string(),
                hint: hint.into(),
            }
        } else {
            Self::ToolFailed {
                command: command.into(),
                source,
            }
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::ToolNotFound { hint, .. } => Some(hint),
            Self::ConfigInvalid { .. } => Some("Check the pyzpack.toml syntax"),
            _ => None,
        }
    }
}
