//! Error types for Wardrobe Core

use thiserror::Error;

/// Main error type for wardrobe operations
#[derive(Error, Debug)]
pub enum WardrobeError {
    /// Required input was missing or malformed
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The local object store could not be opened
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A record with the same key already exists
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-2xx response or transport failure
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<rusqlite::Error> for WardrobeError {
    fn from(err: rusqlite::Error) -> Self {
        WardrobeError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for WardrobeError {
    fn from(err: serde_json::Error) -> Self {
        WardrobeError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for WardrobeError {
    fn from(err: reqwest::Error) -> Self {
        WardrobeError::NetworkError(err.to_string())
    }
}

/// Result type alias for wardrobe operations
pub type Result<T> = std::result::Result<T, WardrobeError>;
