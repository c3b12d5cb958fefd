//! Error types for Handswarm

use thiserror::Error;

/// Main error type for Handswarm
#[derive(Error, Debug)]
pub enum SwarmError {
    #[error("Observation error: {0}")]
    Observation(#[from] ObservationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tracking script error: {0}")]
    Script(#[from] ScriptError),
}

/// A hand observation that the classifier refuses to look at
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObservationError {
    #[error("expected 21 landmarks, got {0}")]
    LandmarkCount(usize),

    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Recorded tracking script errors (driver only)
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    ReadFile(String),

    #[error("Failed to parse script: {0}")]
    Parse(String),
}

/// Result type alias for Handswarm operations
pub type Result<T> = std::result::Result<T, SwarmError>;
