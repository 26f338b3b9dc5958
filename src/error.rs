//! Error types for the limenovel front-end.
//!
//! Uses `thiserror` for structured error definitions. None of these errors
//! are fatal to a view: the view model turns them into inline messages.

use thiserror::Error;

/// Errors raised while talking to the novel API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network or transport failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Body parsed as JSON but did not have the expected shape
    #[error("Unexpected response shape: {0}")]
    Shape(String),

    /// Body was not valid JSON for the expected type
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Returns the HTTP status code, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Error type for navigation query parsing.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavigationError {
    /// A required query parameter is absent or empty
    #[error("Missing navigation parameter: {0}")]
    MissingParameter(&'static str),
}

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid config value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Config directory not found
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Error type for the persisted token storage.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Failed to read or write the storage file
    #[error("Failed to access token storage: {0}")]
    Io(#[from] std::io::Error),

    /// Storage file is not valid JSON
    #[error("Failed to parse token storage: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Result type alias using anyhow for application-level error handling.
pub type Result<T> = anyhow::Result<T>;
