//! Unified error types for Gatehouse.
//!
//! The coordinator itself has no recoverable error states: invalid
//! operations (answering or cancelling with no active gate) are defined
//! no-ops. Errors exist only at the configuration boundary — building a
//! challenge pool or loading a config file.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Gatehouse operations.
#[derive(Error, Debug)]
pub enum GateError {
    /// Configuration errors (invalid values, empty challenge pool).
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed challenge definitions (answer not among options).
    #[error("challenge error: {message}")]
    Challenge { message: String },

    /// I/O errors from config file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A specialized Result type for Gatehouse operations.
pub type Result<T> = std::result::Result<T, GateError>;

impl GateError {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a challenge error.
    pub fn challenge(message: impl Into<String>) -> Self {
        Self::Challenge {
            message: message.into(),
        }
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}

impl From<io::Error> for GateError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = GateError::config("cooldown_ms must be > 0");
        assert_eq!(err.to_string(), "config error: cooldown_ms must be > 0");
    }

    #[test]
    fn test_challenge_error_display() {
        let err = GateError::challenge("answer 7 not among options");
        assert_eq!(
            err.to_string(),
            "challenge error: answer 7 not among options"
        );
    }

    #[test]
    fn test_storage_error_display() {
        let err = GateError::storage(
            "/tmp/config.toml",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("/tmp/config.toml"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let gate_err: GateError = io_err.into();
        assert!(matches!(gate_err, GateError::Storage { .. }));
    }
}
