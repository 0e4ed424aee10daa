//! Error handling module for mediameta

use thiserror::Error;

/// Acquisition-level failures. Any of these aborts the inspection call and no
/// metadata tree is produced.
#[derive(Error, Debug)]
pub enum InspectError {
    /// Input resource does not exist
    #[error("Input not found: {locator}")]
    NotFound { locator: String },

    /// The inspection engine (binary or shared library) could not be used
    #[error("Inspection engine unavailable: {message}")]
    EngineUnavailable { message: String },

    /// The engine was reachable but refused or failed to open the resource
    #[error("Failed to open {locator}: {message}")]
    OpenFailed { locator: String, message: String },

    /// The engine produced output that does not have the expected structure
    #[error("Malformed engine output: {message}")]
    MalformedOutput { message: String },

    /// Inspection did not finish within the configured limit
    #[error("Inspection of {locator} timed out after {seconds}s")]
    Timeout { locator: String, seconds: u64 },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML encoding error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for mediameta operations
pub type InspectResult<T> = std::result::Result<T, InspectError>;
