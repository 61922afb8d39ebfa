//! The `ToolTransport` seam the orchestrator talks through.

use async_trait::async_trait;
use rate_tools::ToolDescriptor;
use serde_json::{Map, Value};

use crate::client::{check_tool_result, ToolClient};
use crate::error::HostError;
use crate::handler::ToolHandler;
use crate::protocol::{CallToolParams, CallToolResult};

/// Discover and invoke tools, wherever they are hosted.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// The live tool catalog.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, HostError>;

    /// Invoke a tool. In-band tool failures surface as [`HostError::ToolCallFailed`].
    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, HostError>;
}

#[async_trait]
impl ToolTransport for ToolClient {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, HostError> {
        ToolClient::list_tools(self).await
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, HostError> {
        ToolClient::call_tool(self, name, arguments).await
    }
}

/// Runs the request handler in-process, without a server process.
#[derive(Clone)]
pub struct LocalTransport {
    handler: ToolHandler,
}

impl LocalTransport {
    pub fn new(handler: ToolHandler) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl ToolTransport for LocalTransport {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, HostError> {
        Ok(self.handler.list_tools())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, HostError> {
        let result = self
            .handler
            .call_tool(CallToolParams {
                name: name.to_string(),
                arguments: Some(Value::Object(arguments)),
            })
            .await;
        check_tool_result(result)
    }
}
