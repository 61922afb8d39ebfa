//! Mock brain implementations for testing.
//!
//! - `ScriptedBrain` - Returns canned replies in order and records prompts
//! - `FailingBrain` - Fails every call with a chosen error
//!
//! For production use `openrouter-brain` and `gemini-brain` instead.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{Brain, ScriptedBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let brain = ScriptedBrain::new(["{\"tool\": \"get_currency_rates\"}"]);
//!     let reply = brain.generate("which tool?").await?;
//!     assert!(reply.contains("get_currency_rates"));
//!     assert_eq!(brain.prompts().await, vec!["which tool?".to_string()]);
//!     Ok(())
//! }
//! ```

mod failing;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError};

pub use failing::FailingBrain;
pub use scripted::ScriptedBrain;
