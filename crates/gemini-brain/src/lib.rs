//! Google Gemini brain implementation.
//!
//! Narrates raw tool output for end users through the `generateContent`
//! endpoint. The prompt is sent as a single user turn with no JSON
//! constraint on the reply.

mod api_types;
mod brain;
mod config;

pub use brain::GeminiBrain;
pub use config::GeminiBrainConfig;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError};
