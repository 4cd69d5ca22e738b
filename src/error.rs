//! `tasklink` Error Types
//!
//! Centralized error handling using thiserror for type-safe errors.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for `tasklink`
#[derive(Error, Debug)]
pub enum TasklinkError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport-level errors raised by the remote client
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Session expired or unauthorized")]
    Unauthorized,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl ApiError {
    /// Text worth showing to the user, if this failure carries any.
    ///
    /// Bare network/decode failures return `None`; stores then fall back to
    /// their operation-specific default message.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ApiError::Status { body, .. } if !body.is_empty() => Some(body.clone()),
            ApiError::Unauthorized => Some("Session expired, please log in again".to_string()),
            _ => None,
        }
    }
}

/// Persisted-session storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read session file '{path}': {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("Failed to write session file '{path}': {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("Persisted session data is corrupted")]
    Corrupted,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for `tasklink` operations
pub type Result<T> = std::result::Result<T, TasklinkError>;

/// Result type alias for transport operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Result type alias for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
