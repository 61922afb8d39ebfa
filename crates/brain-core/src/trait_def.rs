//! The Brain trait definition.

use async_trait::async_trait;

use crate::error::BrainError;

/// A language model reduced to one blocking capability: prompt in, text out.
///
/// Output is free text with no structural guarantee; callers that need
/// structure must recover it themselves. This trait is object-safe and is
/// normally held as `Arc<dyn Brain>`.
#[async_trait]
pub trait Brain: Send + Sync {
    /// Send a prompt and return the model's reply text.
    async fn generate(&self, prompt: &str) -> Result<String, BrainError>;

    /// Short provider label, used in logs and inline error markers.
    fn name(&self) -> &str;
}
