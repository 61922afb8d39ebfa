//! Values passed through a dispatch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The structured decision produced by the selection model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Tool that was invoked.
    pub tool: String,
    /// Arguments as chosen by the selection model, before resolution.
    pub arguments: Map<String, Value>,
    /// Tool output as a rate record, a list of them, or the raw text when
    /// it is not JSON.
    pub tool_output: Value,
    /// Narration of the output, or an inline error marker.
    pub commentary: String,
    /// Tool output exactly as the tool host returned it.
    #[serde(skip)]
    pub raw_output: String,
}

/// Response body of the inbound surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DispatchResponse {
    Success {
        reply: String,
        #[serde(flatten)]
        result: DispatchResult,
    },
    Failure {
        error: String,
    },
}

impl From<DispatchResult> for DispatchResponse {
    fn from(result: DispatchResult) -> Self {
        DispatchResponse::Success {
            reply: result.raw_output.clone(),
            result,
        }
    }
}

impl DispatchResponse {
    pub fn error(message: impl Into<String>) -> Self {
        DispatchResponse::Failure {
            error: message.into(),
        }
    }
}
