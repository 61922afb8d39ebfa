//! The dispatch pipeline: discover, select, recover, execute, narrate.

use std::sync::Arc;

use brain_core::{hash_prompt, Brain};
use serde_json::Value;
use tool_host::ToolTransport;
use tracing::{debug, info, trace, warn};

use crate::error::DispatchError;
use crate::prompt::{
    narration_prompt, selection_prompt, NARRATION_INSTRUCTIONS, SELECTION_INSTRUCTIONS,
};
use crate::recover::parse_tool_call;
use crate::types::{DispatchResponse, DispatchResult};

/// Turns a free-text query into one tool call, its result, and a narration.
///
/// Holds no per-query state; one instance serves any number of concurrent
/// queries. Every remote call is made once, in order.
pub struct Dispatcher {
    transport: Arc<dyn ToolTransport>,
    selector: Arc<dyn Brain>,
    narrator: Arc<dyn Brain>,
}

impl Dispatcher {
    /// Create a dispatcher.
    ///
    /// `selector` picks the tool and should be tuned for terse JSON output;
    /// `narrator` explains the result.
    pub fn new(
        transport: Arc<dyn ToolTransport>,
        selector: Arc<dyn Brain>,
        narrator: Arc<dyn Brain>,
    ) -> Self {
        info!(
            selector = selector.name(),
            narrator = narrator.name(),
            selection_prompt = %hash_prompt(SELECTION_INSTRUCTIONS),
            narration_prompt = %hash_prompt(NARRATION_INSTRUCTIONS),
            "Dispatcher ready"
        );
        Self {
            transport,
            selector,
            narrator,
        }
    }

    /// Run the whole pipeline for one query.
    pub async fn dispatch(&self, query: &str) -> Result<DispatchResult, DispatchError> {
        let tools = self
            .transport
            .list_tools()
            .await
            .map_err(DispatchError::Discovery)?;
        debug!(tools = tools.len(), "Discovered tools");

        let prompt = selection_prompt(query, &tools);
        let reply = self.selector.generate(&prompt).await?;
        trace!(raw_response = %reply, "SELECTION_RAW_RESPONSE");

        let call = parse_tool_call(&reply).map_err(|e| {
            warn!(error = %e, "SELECTION_PARSE_FAILED");
            e
        })?;

        if !tools.iter().any(|t| t.name == call.tool) {
            warn!(tool = %call.tool, "Selected tool is not in the catalog");
            return Err(DispatchError::UnknownTool(call.tool));
        }

        info!(tool = %call.tool, arguments = call.arguments.len(), "Executing selected tool");

        let result = self
            .transport
            .call_tool(&call.tool, call.arguments.clone())
            .await
            .map_err(DispatchError::Execution)?;

        let raw_output = result
            .content
            .first()
            .and_then(|c| c.as_text())
            .unwrap_or_default()
            .to_string();
        let tool_output = serde_json::from_str(&raw_output)
            .unwrap_or_else(|_| Value::String(raw_output.clone()));

        let commentary = self.narrate(&raw_output).await;

        Ok(DispatchResult {
            tool: call.tool,
            arguments: call.arguments,
            tool_output,
            commentary,
            raw_output,
        })
    }

    /// Run the pipeline and fold any failure into an error response.
    pub async fn respond(&self, query: &str) -> DispatchResponse {
        match self.dispatch(query).await {
            Ok(result) => result.into(),
            Err(e) => DispatchResponse::error(e.to_string()),
        }
    }

    /// Narration never fails the dispatch; errors become an inline marker.
    async fn narrate(&self, raw_output: &str) -> String {
        match self.narrator.generate(&narration_prompt(raw_output)).await {
            Ok(commentary) => commentary,
            Err(e) => {
                warn!(error = %e, narrator = self.narrator.name(), "Narration failed");
                format!("[{} API Error] {}", self.narrator.name(), e)
            }
        }
    }
}
