//! Client and server loop connected over in-memory pipes.

use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rate_tools::{rate_registry, CurrencyCatalog, CurrencyResolver, RateApiConfig, RateClient};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tool_host::{
    serve, HostError, LocalTransport, ServerConfig, ToolClient, ToolHandler, ToolTransport,
    PROTOCOL_VERSION,
};

async fn spawn_provider() -> String {
    let app = Router::new()
        .route(
            "/api/v1/currencies",
            get(|| async {
                Json(json!({"data": {"eur": "Euro", "usd": "US Dollar", "gbp": "British Pound"}}))
            }),
        )
        .route(
            "/api/v1/rates/:base",
            get(|Path(base): Path<String>| async move {
                if base == "gbp" {
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"success": false, "message": "boom"})),
                    );
                }
                let rates = json!({"base": base, "date": "2025-08-29", "rates": {"usd": 1.08}});
                (StatusCode::OK, Json(json!({ "data": rates })))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/v1", addr)
}

async fn handler() -> ToolHandler {
    let client = RateClient::new(&RateApiConfig::new(spawn_provider().await)).unwrap();
    let catalog = CurrencyCatalog::load(&client).await.unwrap();
    let registry = rate_registry(client, CurrencyResolver::new(Arc::new(catalog)));
    ToolHandler::new(Arc::new(registry))
}

async fn connected_client() -> ToolClient {
    let handler = handler().await;
    let (client_side, server_side) = tokio::io::duplex(64 * 1024);

    tokio::spawn(async move {
        let (reader, writer) = tokio::io::split(server_side);
        serve(&handler, reader, writer).await.unwrap();
    });

    let (reader, writer) = tokio::io::split(client_side);
    let client = ToolClient::from_streams(reader, writer);
    client.initialize().await.unwrap();
    client
}

fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[tokio::test]
async fn test_list_tools_over_pipe() {
    let client = connected_client().await;
    let tools = client.list_tools().await.unwrap();

    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "get_currency_rates",
            "get_single_exchange_rate",
            "get_historical_rates",
            "get_rate_range",
            "get_crypto_rates",
        ]
    );
    assert_eq!(
        tools[1].input_schema["properties"]["to_currency"]["default"],
        "USD"
    );
}

#[tokio::test]
async fn test_call_tool_over_pipe() {
    let client = connected_client().await;
    let result = client
        .call_tool("get_currency_rates", args(json!({"base": "euro"})))
        .await
        .unwrap();

    assert!(!result.is_error);
    let record: Value = serde_json::from_str(&result.joined_text()).unwrap();
    assert_eq!(
        record,
        json!({"base": "eur", "date": "2025-08-29", "rates": {"usd": 1.08}})
    );
}

#[tokio::test]
async fn test_provider_failure_is_tool_call_failed() {
    let client = connected_client().await;
    let err = client
        .call_tool("get_currency_rates", args(json!({"base": "British Pound"})))
        .await
        .unwrap_err();

    match err {
        HostError::ToolCallFailed(text) => assert!(text.starts_with("Rate provider returned 500")),
        other => panic!("expected ToolCallFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_calls_share_one_connection() {
    let client = Arc::new(connected_client().await);

    let mut tasks = Vec::new();
    for base in ["eur", "usd", "eur", "usd"] {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            let result = client
                .call_tool("get_currency_rates", args(json!({"base": base})))
                .await
                .unwrap();
            let record: Value = serde_json::from_str(&result.joined_text()).unwrap();
            (base, record["base"].as_str().unwrap().to_string())
        }));
    }

    for task in tasks {
        let (asked, got) = task.await.unwrap();
        assert_eq!(asked, got);
    }
}

#[tokio::test]
async fn test_local_transport_matches_stdio() {
    let local = LocalTransport::new(handler().await);
    let remote = connected_client().await;

    let local_names: Vec<String> = local
        .list_tools()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    let remote_names: Vec<String> = remote
        .list_tools()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(local_names, remote_names);

    let err = local
        .call_tool("get_weather", Map::new())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "tool call failed: Tool not found: get_weather"
    );
}

#[tokio::test]
async fn test_mismatched_response_id() {
    let (client_side, server_side) = tokio::io::duplex(4096);

    tokio::spawn(async move {
        let (reader, mut writer) = tokio::io::split(server_side);
        let mut lines = BufReader::new(reader).lines();
        if lines.next_line().await.unwrap().is_some() {
            writer
                .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":99,\"result\":{}}\n")
                .await
                .unwrap();
        }
    });

    let (reader, writer) = tokio::io::split(client_side);
    let client = ToolClient::from_streams(reader, writer);
    let err = client.initialize().await.unwrap_err();
    assert!(matches!(err, HostError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_oversized_response_rejected() {
    let (client_side, server_side) = tokio::io::duplex(64 * 1024);

    tokio::spawn(async move {
        let (reader, mut writer) = tokio::io::split(server_side);
        let mut lines = BufReader::new(reader).lines();
        if lines.next_line().await.unwrap().is_some() {
            let mut huge = vec![b'x'; tool_host::MAX_OUTPUT_SIZE + 16];
            huge.push(b'\n');
            writer.write_all(&huge).await.unwrap();
        }
    });

    let (reader, writer) = tokio::io::split(client_side);
    let client = ToolClient::from_streams(reader, writer);
    let err = client.initialize().await.unwrap_err();
    assert!(matches!(err, HostError::OutputTooLarge { .. }));
}

/// Fake server answering every `tools/call` with the tool's name as text.
/// A call to `slow` is held until `release` fires; every call name is
/// reported on `received` as it arrives.
async fn echo_server(
    server_side: tokio::io::DuplexStream,
    received: mpsc::UnboundedSender<String>,
    release: oneshot::Receiver<()>,
) {
    let (reader, mut writer) = tokio::io::split(server_side);
    let mut lines = BufReader::new(reader).lines();
    let mut release = Some(release);

    while let Ok(Some(line)) = lines.next_line().await {
        let request: Value = serde_json::from_str(&line).unwrap();
        let Some(id) = request.get("id").cloned() else {
            continue;
        };

        let result = if request["method"] == "initialize" {
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {"name": "echo"}
            })
        } else {
            let name = request["params"]["name"].as_str().unwrap().to_string();
            let _ = received.send(name.clone());
            if name == "slow" {
                if let Some(release) = release.take() {
                    let _ = release.await;
                }
            }
            json!({"content": [{"type": "text", "text": name}], "isError": false})
        };

        let reply = json!({"jsonrpc": "2.0", "id": id, "result": result});
        let payload = format!("{}\n", reply);
        if writer.write_all(payload.as_bytes()).await.is_err() {
            break;
        }
    }
}

#[tokio::test]
async fn test_cancelled_call_leaves_connection_usable() {
    let (client_side, server_side) = tokio::io::duplex(64 * 1024);
    let (received_tx, mut received_rx) = mpsc::unbounded_channel();
    let (release_tx, release_rx) = oneshot::channel();
    tokio::spawn(echo_server(server_side, received_tx, release_rx));

    let (reader, writer) = tokio::io::split(client_side);
    let client = Arc::new(ToolClient::from_streams(reader, writer));
    client.initialize().await.unwrap();

    let slow = tokio::spawn({
        let client = client.clone();
        async move { client.call_tool("slow", Map::new()).await }
    });
    assert_eq!(received_rx.recv().await.unwrap(), "slow");
    slow.abort();
    assert!(slow.await.unwrap_err().is_cancelled());

    // The reply to the abandoned call now sits ahead of the next one.
    release_tx.send(()).unwrap();

    for name in ["fast", "again", "last"] {
        let result = client.call_tool(name, Map::new()).await.unwrap();
        assert_eq!(result.joined_text(), name);
    }
}

#[tokio::test]
async fn test_oversized_response_does_not_desync() {
    let (client_side, server_side) = tokio::io::duplex(64 * 1024);

    tokio::spawn(async move {
        let (reader, mut writer) = tokio::io::split(server_side);
        let mut lines = BufReader::new(reader).lines();
        let mut replied = 0;
        while let Ok(Some(line)) = lines.next_line().await {
            let request: Value = serde_json::from_str(&line).unwrap();
            let Some(id) = request.get("id").cloned() else {
                continue;
            };
            replied += 1;
            if replied == 1 {
                let mut huge = vec![b'x'; tool_host::MAX_OUTPUT_SIZE * 2];
                huge.push(b'\n');
                writer.write_all(&huge).await.unwrap();
            }
            let reply = json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": PROTOCOL_VERSION,
                    "serverInfo": {"name": "big"}
                }
            });
            writer
                .write_all(format!("{}\n", reply).as_bytes())
                .await
                .unwrap();
        }
    });

    let (reader, writer) = tokio::io::split(client_side);
    let client = ToolClient::from_streams(reader, writer);
    let err = client.initialize().await.unwrap_err();
    assert!(matches!(err, HostError::OutputTooLarge { .. }));

    // The reply behind the oversized line belongs to the failed request
    // and is skipped; the retry gets its own.
    let result = client.initialize().await.unwrap();
    assert_eq!(result.server_info.name, "big");
}

/// A shell server that answers `initialize` and `tools/list`, and exits
/// on any `tools/call`.
#[cfg(unix)]
const EXITING_SERVER: &str = r#"
while read -r line; do
  case "$line" in
    *'"id":'*) ;;
    *) continue ;;
  esac
  id=$(printf '%s' "$line" | sed 's/.*"id":\([0-9]*\).*/\1/')
  case "$line" in
    *'"tools/call"'*) exit 0 ;;
    *'"initialize"'*)
      printf '{"jsonrpc":"2.0","id":%s,"result":{"protocolVersion":"2024-11-05","serverInfo":{"name":"sh"}}}\n' "$id" ;;
    *)
      printf '{"jsonrpc":"2.0","id":%s,"result":{"tools":[]}}\n' "$id" ;;
  esac
done
"#;

#[cfg(unix)]
#[tokio::test]
async fn test_spawned_server_is_respawned_after_exit() {
    let config = ServerConfig {
        command: "sh".to_string(),
        args: vec!["-c".to_string(), EXITING_SERVER.to_string()],
    };
    let client = ToolClient::spawn(&config).await.unwrap();
    assert!(client.list_tools().await.unwrap().is_empty());

    let err = client.call_tool("anything", Map::new()).await.unwrap_err();
    assert!(matches!(err, HostError::ServerExited | HostError::Io(_)));

    assert!(client.list_tools().await.unwrap().is_empty());
}
