//! Scripted brain - replays canned replies.

use std::collections::VecDeque;

use brain_core::{async_trait, Brain, BrainError};
use tokio::sync::Mutex;

/// A brain that answers with pre-recorded replies, one per call.
///
/// Once the script runs out every further call fails with
/// [`BrainError::Unavailable`], which makes unexpected extra calls visible
/// in tests.
#[derive(Debug)]
pub struct ScriptedBrain {
    name: String,
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBrain {
    /// Create a scripted brain with the given replies.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: "Scripted".to_string(),
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Override the provider label returned by `name()`.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Every prompt received so far, in call order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    /// Number of `generate` calls made so far.
    pub async fn call_count(&self) -> usize {
        self.prompts.lock().await.len()
    }
}

#[async_trait]
impl Brain for ScriptedBrain {
    async fn generate(&self, prompt: &str) -> Result<String, BrainError> {
        self.prompts.lock().await.push(prompt.to_string());
        self.replies
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| BrainError::Unavailable("script exhausted".to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
