//! Tool-invocation transport for the rate tools.
//!
//! The tools run in a separate process (`rate-tool-server`) that speaks
//! newline-delimited JSON-RPC 2.0 over stdin/stdout:
//!
//! - `initialize` / `notifications/initialized` handshake
//! - `tools/list` returns `{tools: [{name, description, inputSchema}]}`
//! - `tools/call` returns `{content: [{type: "text", text}], isError}`
//!
//! [`ToolClient`] drives that process; [`LocalTransport`] runs the same
//! [`ToolHandler`] in-process. Both implement [`ToolTransport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use tool_host::{ServerConfig, ToolClient, ToolTransport};
//!
//! let client = ToolClient::spawn(&ServerConfig::from_env()).await?;
//! for tool in client.list_tools().await? {
//!     println!("{}: {}", tool.name, tool.description);
//! }
//! ```

mod client;
mod error;
mod handler;
mod protocol;
mod server;
mod transport;

pub use client::{ServerConfig, ToolClient, DEFAULT_SERVER_COMMAND, MAX_OUTPUT_SIZE};
pub use error::HostError;
pub use handler::ToolHandler;
pub use protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, PeerInfo, RequestId, ToolContent,
    INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};
pub use server::{serve, serve_stdio};
pub use transport::{LocalTransport, ToolTransport};
