//! Core error types for dayplan-core.
//!
//! Only contract violations are errors. Policy rejections such as "no slot
//! found" are reported as `None` plus a tracing event and routed to the
//! waitlist by the scheduler.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dayplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Scheduling contract violations
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Record validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors raised by the scheduling core itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// Priority weights do not sum to 1.0
    #[error("Weights must sum to 1 (got {sum:.3})")]
    InvalidWeights { sum: f64 },

    /// Pop or peek on an empty waitlist
    #[error("{operation} from an empty priority queue")]
    EmptyQueue { operation: &'static str },

    /// A time value had an unexpected shape or range
    #[error("Invalid time value: {0}")]
    InvalidTime(String),

    /// A duration that must be positive was not
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// An interval would extend past the end of the day
    #[error("Interval starting at {start} with {minutes} minutes runs past 24:00")]
    OutOfDay { start: String, minutes: u32 },
}

/// Validation errors for caller-supplied records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {}: {message}", path.display())]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {}: {message}", path.display())]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
