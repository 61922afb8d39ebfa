//! Error types for brain operations.

use thiserror::Error;

/// Errors that can occur while generating text.
#[derive(Debug, Error)]
pub enum BrainError {
    /// A required setting (usually a credential) is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered, but not with usable text.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The brain cannot serve requests right now.
    #[error("brain unavailable: {0}")]
    Unavailable(String),
}
