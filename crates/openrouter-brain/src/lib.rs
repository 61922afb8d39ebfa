//! OpenRouter-based brain implementation.
//!
//! This crate provides the brain that picks a tool for a user query. It
//! talks to OpenRouter's OpenAI-compatible chat-completions endpoint with
//! deterministic-leaning sampling, since its output must parse as JSON.
//!
//! # Usage
//!
//! ```rust,no_run
//! use openrouter_brain::{Brain, OpenRouterBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = OpenRouterBrain::from_env()?;
//!     let reply = brain.generate("Reply with {\"ok\": true}").await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::OpenRouterBrain;
pub use config::{OpenRouterBrainConfig, OpenRouterBrainConfigBuilder};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError};
