//! Core trait and types for LLM brains.
//!
//! The dispatch pipeline talks to language models through a single narrow
//! capability: hand over a prompt, get free text back. This crate defines:
//!
//! - [`Brain`] - The trait every LLM adapter implements
//! - [`BrainError`] - Error types for brain operations
//! - [`hash_prompt`] - Stable fingerprints for logging prompt versions
//!
//! Two production adapters exist (`openrouter-brain` for tool selection,
//! `gemini-brain` for narration). Tests substitute `mock-brain`.
//!
//! # Example
//!
//! ```rust
//! use brain_core::{Brain, BrainError};
//! use async_trait::async_trait;
//!
//! struct ShoutBrain;
//!
//! #[async_trait]
//! impl Brain for ShoutBrain {
//!     async fn generate(&self, prompt: &str) -> Result<String, BrainError> {
//!         Ok(prompt.to_uppercase())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Shout"
//!     }
//! }
//! ```

mod error;
mod prompt;
mod trait_def;

pub use error::BrainError;
pub use prompt::hash_prompt;
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
