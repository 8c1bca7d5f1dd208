//! Core error types for okrbox-core.
//!
//! The scoring pipeline itself never fails; these errors only surface at the
//! edges where configuration and plan snapshots are read from disk or user
//! input is validated.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for okrbox-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot loading errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Data directory could not be resolved or created
    #[error("Failed to prepare data directory {}: {source}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load configuration
    #[error("Failed to load configuration from {}: {message}", path.display())]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {}: {message}", path.display())]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors reading an exported plan snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Snapshot file could not be read
    #[error("Failed to read snapshot {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file could not be parsed
    #[error("Failed to parse snapshot {}: {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot could not be encoded
    #[error("Failed to encode snapshot {}: {source}", path.display())]
    EncodeFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot could not be written
    #[error("Failed to write snapshot {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Timestamp outside the representable calendar range
    #[error("Timestamp {0} ms is out of range")]
    TimestampOutOfRange(i64),

    /// Input could not be parsed as an instant
    #[error("Invalid instant '{0}': expected RFC 3339 or epoch milliseconds")]
    InvalidInstant(String),

    /// UTC offset outside +-18h
    #[error("Invalid UTC offset: {minutes} minutes")]
    InvalidOffset { minutes: i32 },

    /// Unknown reporting window name
    #[error("Unknown reporting window '{0}': expected week, month or quarter")]
    UnknownWindow(String),

    /// Record id not present in the snapshot
    #[error("No {kind} with id '{id}'")]
    UnknownRecord { kind: &'static str, id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Unaligned action too large to take on directly
    #[error("Actions over {limit} minutes need a key result; park '{title}' ({minutes} min) as an idea instead")]
    NeedsParking { title: String, minutes: f64, limit: f64 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
