//! Failing brain - every call errors.

use std::sync::atomic::{AtomicUsize, Ordering};

use brain_core::{async_trait, Brain, BrainError};

/// A brain whose every call fails with a network error.
///
/// Useful for exercising degradation paths (narration markers, selection
/// aborts) without a real provider.
#[derive(Debug)]
pub struct FailingBrain {
    name: String,
    message: String,
    calls: AtomicUsize,
}

impl FailingBrain {
    /// Create a failing brain that reports the given message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Brain for FailingBrain {
    async fn generate(&self, _prompt: &str) -> Result<String, BrainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(BrainError::Network(self.message.clone()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
