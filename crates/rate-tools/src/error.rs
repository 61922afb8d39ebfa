//! Error types for tool operations.

use thiserror::Error;

/// Errors that can occur during tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool not found in registry.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Invalid parameter value.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The rate provider answered with a non-success status.
    #[error("Rate provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    /// HTTP request failed before a status was received.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Missing or malformed setting.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<url::ParseError> for ToolError {
    fn from(err: url::ParseError) -> Self {
        ToolError::Configuration(format!("invalid rate provider URL: {}", err))
    }
}
