//! Error types for LexiSync.
//!
//! Library crates use [`LexiSyncError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all LexiSync operations.
#[derive(Debug, thiserror::Error)]
pub enum LexiSyncError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Remote course-provider failure (network, auth, rate-limit).
    #[error("provider error: {0}")]
    Provider(String),

    /// Cache read/write/parse failure, distinct from a legitimate miss.
    #[error("cache error: {message}")]
    Cache { message: String },

    /// Document-store bulk-write failure or partial application.
    #[error("storage error: {0}")]
    Storage(String),

    /// Broken pipeline invariant (unknown course id, empty selection,
    /// misaligned translation response, ...).
    #[error("invariant violation: {message}")]
    Invariant { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LexiSyncError>;

impl LexiSyncError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a cache error from any displayable message.
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache {
            message: msg.into(),
        }
    }

    /// Create an invariant-violation error from any displayable message.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
