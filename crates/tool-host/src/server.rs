//! Line-oriented server loop.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::error::HostError;
use crate::handler::ToolHandler;
use crate::protocol::{JsonRpcError, JsonRpcResponse, PARSE_ERROR};

/// Serve requests read line by line from `reader`, answering on `writer`,
/// until the reader hits EOF.
///
/// A line that is not UTF-8 is answered with a parse error and skipped.
pub async fn serve<R, W>(handler: &ToolHandler, reader: R, mut writer: W) -> Result<(), HostError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&line) {
            Ok(text) if text.trim().is_empty() => continue,
            Ok(text) => handler.handle_line(text).await,
            Err(e) => {
                debug!("Request line is not UTF-8: {}", e);
                Some(JsonRpcResponse::failure(
                    None,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                ))
            }
        };

        let Some(response) = response else {
            continue;
        };

        let mut payload = serde_json::to_vec(&response)?;
        payload.push(b'\n');
        writer.write_all(&payload).await?;
        writer.flush().await?;
    }

    debug!("Input closed, stopping tool server loop");
    Ok(())
}

/// Serve over the process's stdin/stdout.
pub async fn serve_stdio(handler: &ToolHandler) -> Result<(), HostError> {
    info!("Serving {} tools over stdio", handler.list_tools().len());
    serve(handler, tokio::io::stdin(), tokio::io::stdout()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use rate_tools::ToolRegistry;

    use crate::protocol::RequestId;

    #[tokio::test]
    async fn invalid_utf8_line_keeps_serving() {
        let handler = ToolHandler::new(Arc::new(ToolRegistry::new()));
        let (client_side, server_side) = tokio::io::duplex(4096);

        let server = tokio::spawn(async move {
            let (reader, writer) = tokio::io::split(server_side);
            serve(&handler, reader, writer).await
        });

        let (reader, mut writer) = tokio::io::split(client_side);
        writer.write_all(b"\xff\xfe{\n").await.unwrap();
        writer
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n")
            .await
            .unwrap();

        let mut lines = BufReader::new(reader).lines();

        let first: JsonRpcResponse =
            serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert!(first.id.is_none());
        assert_eq!(first.into_result().unwrap_err().code, PARSE_ERROR);

        let second: JsonRpcResponse =
            serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(second.id, Some(RequestId::Number(2)));
        assert_eq!(second.into_result().unwrap()["tools"], serde_json::json!([]));

        drop(writer);
        drop(lines);
        server.await.unwrap().unwrap();
    }
}
