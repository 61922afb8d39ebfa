//! Error types for dispatch.

use brain_core::BrainError;
use thiserror::Error;
use tool_host::HostError;

/// Ways a dispatch can end without a result.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The tool catalog could not be fetched.
    #[error("tool discovery failed: {0}")]
    Discovery(#[source] HostError),

    /// The selection model could not be reached.
    #[error("tool selection failed: {0}")]
    Selection(#[from] BrainError),

    /// The selection reply was not a usable tool call. `raw` is the reply
    /// after fence stripping.
    #[error("Invalid JSON from LLM: {raw}")]
    MalformedSelection { raw: String },

    /// The selected tool is not in the discovered catalog.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The tool ran and failed, or the transport broke while it ran.
    #[error("tool execution failed: {0}")]
    Execution(#[source] HostError),
}

impl DispatchError {
    /// Whether this is a reported selection problem rather than a failure
    /// of the system itself.
    pub fn is_malformed_selection(&self) -> bool {
        matches!(self, DispatchError::MalformedSelection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_selection_message() {
        let err = DispatchError::MalformedSelection {
            raw: "not json".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid JSON from LLM: not json");
        assert!(err.is_malformed_selection());
    }

    #[test]
    fn execution_message_keeps_provider_text() {
        let err = DispatchError::Execution(HostError::ToolCallFailed(
            "Rate provider returned 500: boom".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "tool execution failed: tool call failed: Rate provider returned 500: boom"
        );
        assert!(!err.is_malformed_selection());
    }
}
