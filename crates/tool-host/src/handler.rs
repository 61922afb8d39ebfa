//! Request handling for the tool protocol, shared by the stdio server and
//! the in-process transport.

use std::collections::HashMap;
use std::sync::Arc;

use rate_tools::{ToolDescriptor, ToolError, ToolRegistry};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, PeerInfo, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR,
    PROTOCOL_VERSION,
};

/// Name announced in the `initialize` result.
const SERVER_NAME: &str = "rate-tool-server";

/// Answers protocol requests from a [`ToolRegistry`].
#[derive(Clone)]
pub struct ToolHandler {
    registry: Arc<ToolRegistry>,
}

impl ToolHandler {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Descriptors of every hosted tool, in registration order.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.registry.descriptors()
    }

    /// Run a tool. Tool failures are reported in-band with `is_error` set.
    pub async fn call_tool(&self, params: CallToolParams) -> CallToolResult {
        let arguments: HashMap<String, Value> = match params.arguments {
            None | Some(Value::Null) => HashMap::new(),
            Some(Value::Object(map)) => map.into_iter().collect(),
            Some(other) => {
                return CallToolResult::error(format!(
                    "Tool arguments must be an object, got: {}",
                    other
                ))
            }
        };

        match self.registry.execute(&params.name, arguments).await {
            Ok(output) => match serde_json::to_string(&output) {
                Ok(text) => CallToolResult::text(text),
                Err(e) => CallToolResult::error(ToolError::from(e).to_string()),
            },
            Err(e) => {
                warn!("Tool '{}' failed: {}", params.name, e);
                CallToolResult::error(e.to_string())
            }
        }
    }

    /// Handle one raw protocol line. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                debug!("Unreadable request line: {}", e);
                Some(JsonRpcResponse::failure(
                    None,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                ))
            }
        }
    }

    /// Handle one decoded request. Returns `None` for notifications.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!("Notification received: {}", request.method);
            return None;
        }

        let id = request.id.clone();
        let outcome = match request.method.as_str() {
            "initialize" => self.initialize_result(),
            "tools/list" => serde_json::to_value(ListToolsResult {
                tools: self.list_tools(),
            })
            .map_err(internal_error),
            "tools/call" => match decode_params::<CallToolParams>(request.params) {
                Ok(params) => {
                    serde_json::to_value(self.call_tool(params).await).map_err(internal_error)
                }
                Err(e) => Err(e),
            },
            other => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    fn initialize_result(&self) -> Result<Value, JsonRpcError> {
        serde_json::to_value(InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: json!({"tools": {}}),
            server_info: PeerInfo::this_crate(SERVER_NAME),
        })
        .map_err(internal_error)
    }
}

fn decode_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    serde_json::from_value(params.unwrap_or(Value::Null))
        .map_err(|e| JsonRpcError::new(INVALID_PARAMS, format!("Invalid params: {}", e)))
}

fn internal_error(e: serde_json::Error) -> JsonRpcError {
    JsonRpcError::new(-32603, format!("Internal error: {}", e))
}
