//! Error types for the rebloom client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using RebloomError
pub type Result<T> = std::result::Result<T, RebloomError>;

/// Unified error type for rebloom operations
#[derive(Debug, Error)]
pub enum RebloomError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("unable to connect to redis server {host}:{port}: {message}")]
    Connection {
        host: String,
        port: u16,
        message: String,
    },

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("transport error: {0}")]
    Transport(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Validation Errors (raised before any network call)
    // -------------------------------------------------------------------------
    #[error("error rate must be in the open interval (0, 1), got {0}")]
    ErrorRateOutOfBounds(f64),

    #[error("{name} must be a positive integer, got {value}")]
    NotPositive { name: &'static str, value: u64 },

    // -------------------------------------------------------------------------
    // Server-Reported Errors
    // -------------------------------------------------------------------------
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("key already exists: {0}")]
    KeyAlreadyExists(String),

    #[error("merge rejected: {0}")]
    Merge(String),
}

impl RebloomError {
    /// Classify an error string reported by the server.
    ///
    /// RedisBloom reports missing and duplicate keys only through the error
    /// message text ("ERR not found", "ERR item exists", "CMS: key does not
    /// exist", ...), so the message is the only signal available.
    pub(crate) fn from_server(message: String) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("not found") || lower.contains("does not exist") {
            RebloomError::KeyNotFound(message)
        } else if lower.contains("exist") {
            RebloomError::KeyAlreadyExists(message)
        } else {
            RebloomError::Transport(message)
        }
    }
}
