//! Client side of the tool protocol.

use std::env;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use rate_tools::ToolDescriptor;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::HostError;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, RequestId,
};

/// Maximum size of one response line (1 MiB).
pub const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// Default tool server executable.
pub const DEFAULT_SERVER_COMMAND: &str = "rate-tool-server";

/// How to launch the tool server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_SERVER_COMMAND.to_string(),
            args: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Read `TOOL_SERVER_COMMAND` and whitespace-separated `TOOL_SERVER_ARGS`.
    pub fn from_env() -> Self {
        let command = env::var("TOOL_SERVER_COMMAND")
            .ok()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_COMMAND.to_string());
        let args = env::var("TOOL_SERVER_ARGS")
            .map(|a| a.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        Self { command, args }
    }
}

type BoxedReader = BufReader<Box<dyn AsyncRead + Send + Unpin>>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Both halves of the connection, locked together so a request and its
/// response are never interleaved with another caller's.
struct Connection {
    reader: BoxedReader,
    writer: BoxedWriter,
    // Killed on drop, so replacing the connection reaps the old server.
    _child: Option<Child>,
}

impl Connection {
    fn new<R, W>(reader: R, writer: W, child: Option<Child>) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let reader: Box<dyn AsyncRead + Send + Unpin> = Box::new(reader);
        Self {
            reader: BufReader::new(reader),
            writer: Box::new(writer),
            _child: child,
        }
    }

    /// Launch the server process with piped stdio.
    fn launch(config: &ServerConfig) -> Result<Self, HostError> {
        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| HostError::Spawn {
            command: config.command.clone(),
            source,
        })?;

        let stdin = child.stdin.take().ok_or_else(|| HostError::Spawn {
            command: config.command.clone(),
            source: std::io::Error::other("failed to capture stdin"),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| HostError::Spawn {
            command: config.command.clone(),
            source: std::io::Error::other("failed to capture stdout"),
        })?;

        info!("Spawned tool server: {}", config.command);
        Ok(Self::new(stdout, stdin, Some(child)))
    }

    async fn send(&mut self, message: &JsonRpcRequest) -> Result<(), HostError> {
        let mut payload = serde_json::to_vec(message)?;
        payload.push(b'\n');
        self.writer.write_all(&payload).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send `request` and wait for the response carrying `id`.
    ///
    /// Responses to earlier requests whose callers went away are skipped.
    async fn exchange(
        &mut self,
        request: &JsonRpcRequest,
        id: &RequestId,
    ) -> Result<JsonRpcResponse, HostError> {
        self.send(request).await?;

        loop {
            let response = self.read_response().await?;
            match (&response.id, id) {
                (Some(got), _) if got == id => return Ok(response),
                (Some(RequestId::Number(got)), RequestId::Number(want)) if got < want => {
                    debug!("Discarding stale response {} while waiting for {}", got, want);
                }
                _ => {
                    return Err(HostError::InvalidResponse(format!(
                        "response ID mismatch: expected {:?}, got {:?}",
                        id, response.id
                    )));
                }
            }
        }
    }

    async fn read_response(&mut self) -> Result<JsonRpcResponse, HostError> {
        let mut line = Vec::new();
        let limit = MAX_OUTPUT_SIZE as u64 + 1;
        let bytes_read = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut line)
            .await?;
        if bytes_read == 0 {
            return Err(HostError::ServerExited);
        }

        if line.len() > MAX_OUTPUT_SIZE {
            if !line.ends_with(b"\n") {
                self.discard_line().await?;
            }
            return Err(HostError::OutputTooLarge {
                size: line.len(),
                max: MAX_OUTPUT_SIZE,
            });
        }

        Ok(serde_json::from_slice(&line)?)
    }

    /// Skip the rest of the current line without buffering it.
    async fn discard_line(&mut self) -> Result<(), HostError> {
        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                return Ok(());
            }
            let newline = buf.iter().position(|&b| b == b'\n');
            let len = buf.len();
            match newline {
                Some(pos) => {
                    self.reader.consume(pos + 1);
                    return Ok(());
                }
                None => self.reader.consume(len),
            }
        }
    }
}

/// Client for a tool server speaking the line protocol.
///
/// A client created by [`spawn`](Self::spawn) respawns the server and
/// repeats the handshake when the connection is lost. The request that
/// observed the loss still fails.
pub struct ToolClient {
    connection: Mutex<Connection>,
    server: Option<ServerConfig>,
    next_id: AtomicI64,
    initialized: AtomicBool,
}

impl ToolClient {
    /// Spawn the tool server and complete the `initialize` handshake.
    pub async fn spawn(config: &ServerConfig) -> Result<Self, HostError> {
        let client = Self {
            connection: Mutex::new(Connection::launch(config)?),
            server: Some(config.clone()),
            next_id: AtomicI64::new(1),
            initialized: AtomicBool::new(false),
        };
        client.initialize().await?;
        Ok(client)
    }

    /// Wrap an existing connection. Call [`initialize`](Self::initialize) before use.
    pub fn from_streams<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            connection: Mutex::new(Connection::new(reader, writer, None)),
            server: None,
            next_id: AtomicI64::new(1),
            initialized: AtomicBool::new(false),
        }
    }

    /// Perform the `initialize` handshake.
    pub async fn initialize(&self) -> Result<InitializeResult, HostError> {
        let mut connection = self.connection.lock().await;
        let result = self.handshake(&mut connection).await?;
        self.initialized.store(true, Ordering::SeqCst);

        debug!(
            "Tool server ready: {} (protocol {})",
            result.server_info.name, result.protocol_version
        );
        Ok(result)
    }

    /// Fetch the tool catalog.
    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, HostError> {
        self.ensure_initialized()?;
        let result: ListToolsResult = self.request("tools/list", None::<()>).await?;
        Ok(result.tools)
    }

    /// Call a tool. A result flagged `isError` becomes [`HostError::ToolCallFailed`].
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, HostError> {
        self.ensure_initialized()?;
        let params = CallToolParams {
            name: name.to_string(),
            arguments: Some(Value::Object(arguments)),
        };
        let result: CallToolResult = self.request("tools/call", Some(params)).await?;
        check_tool_result(result)
    }

    fn ensure_initialized(&self) -> Result<(), HostError> {
        if self.initialized.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(HostError::NotInitialized)
        }
    }

    fn next_request_id(&self) -> RequestId {
        RequestId::Number(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn handshake(&self, connection: &mut Connection) -> Result<InitializeResult, HostError> {
        let id = self.next_request_id();
        let request = JsonRpcRequest::new(id.clone(), "initialize")
            .with_params(InitializeParams::default())?;
        let response = connection.exchange(&request, &id).await?;
        let result: InitializeResult = serde_json::from_value(response.into_result()?)?;

        connection
            .send(&JsonRpcRequest::notification("notifications/initialized"))
            .await?;
        Ok(result)
    }

    async fn request<P, R>(&self, method: &str, params: Option<P>) -> Result<R, HostError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = self.next_request_id();
        let mut request = JsonRpcRequest::new(id.clone(), method);
        if let Some(p) = params {
            request = request.with_params(p)?;
        }

        let response = {
            let mut connection = self.connection.lock().await;
            let outcome = connection.exchange(&request, &id).await;
            if matches!(outcome, Err(HostError::ServerExited | HostError::Io(_))) {
                self.reconnect(&mut connection).await;
            }
            outcome?
        };

        let result_value = response.into_result()?;
        Ok(serde_json::from_value(result_value)?)
    }

    /// Replace a lost connection with a freshly spawned server.
    async fn reconnect(&self, connection: &mut Connection) {
        let Some(config) = &self.server else {
            return;
        };

        warn!("Tool server connection lost, respawning {}", config.command);
        match Connection::launch(config) {
            Ok(fresh) => {
                *connection = fresh;
                if let Err(e) = self.handshake(connection).await {
                    warn!("Respawned tool server failed to initialize: {}", e);
                }
            }
            Err(e) => warn!("Failed to respawn tool server: {}", e),
        }
    }
}

/// Map an in-band tool failure to an error.
pub(crate) fn check_tool_result(result: CallToolResult) -> Result<CallToolResult, HostError> {
    if result.is_error {
        Err(HostError::ToolCallFailed(result.joined_text()))
    } else {
        Ok(result)
    }
}
