//! Error types for the link conversion system.
//!
//! All errors in the system are represented by the [`Error`] enum.
//! Resolution and formatting never produce errors; only store I/O
//! and settings persistence do.

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The core error type for all link conversion operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Document not found in the store
    #[error("Document not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Invalid document path (empty, absolute, etc.)
    #[error("Invalid document path: {reason}")]
    InvalidPath { reason: String },

    /// Path traversal attempt detected
    #[error("Path traversal detected: {path}")]
    PathTraversalAttempt { path: PathBuf },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Store rejected a write
    #[error("Write rejected for {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    /// Generic unclassified error
    #[error("Error: {0}")]
    Other(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an IO error
    pub fn io(err: io::Error) -> Self {
        Error::Io(err)
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Create an invalid path error
    pub fn invalid_path(reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            reason: reason.into(),
        }
    }

    /// Create a path traversal error
    pub fn path_traversal(path: impl Into<PathBuf>) -> Self {
        Error::PathTraversalAttempt { path: path.into() }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create a write failure
    pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::WriteFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::file_not_found("notes/missing.md");
        assert!(err.to_string().contains("Document not found"));

        let err = Error::invalid_path("empty path");
        assert!(err.to_string().contains("Invalid document path"));
    }

    #[test]
    fn test_write_failed_message() {
        let err = Error::write_failed("a.md", "read-only");
        assert_eq!(err.to_string(), "Write rejected for a.md: read-only");
    }
}
