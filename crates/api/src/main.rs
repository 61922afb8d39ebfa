//! `rate-api`: HTTP front door for rate queries.
//!
//! - `POST /chat` with `{"query": "..."}` (or `{"prompt": "..."}`)
//! - `GET /health`

mod config;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use brain_core::Brain;
use gemini_brain::GeminiBrain;
use openrouter_brain::OpenRouterBrain;
use orchestrator::{DispatchError, DispatchResponse, Dispatcher};
use rate_tools::{rate_registry, CurrencyCatalog, CurrencyResolver, RateClient};
use serde::{Deserialize, Serialize};
use tool_host::{LocalTransport, ToolClient, ToolHandler, ToolTransport};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{ApiConfig, TransportKind};

#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    prompt: Option<String>,
}

impl ChatRequest {
    /// `query` wins over `prompt`; blank values count as absent.
    fn text(&self) -> Option<&str> {
        non_blank(&self.query).or_else(|| non_blank(&self.prompt))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Serialize)]
struct Health {
    status: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env()?;

    // Credentials are checked before anything touches the network.
    let selector: Arc<dyn Brain> = Arc::new(OpenRouterBrain::from_env()?);
    let narrator: Arc<dyn Brain> = Arc::new(GeminiBrain::from_env()?);

    let transport = build_transport(&config.transport).await?;
    let state = AppState {
        dispatcher: Arc::new(Dispatcher::new(transport, selector, narrator)),
    };

    let app = router(state);

    info!(addr = %config.addr, "Rate API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_transport(
    kind: &TransportKind,
) -> Result<Arc<dyn ToolTransport>, Box<dyn std::error::Error>> {
    match kind {
        TransportKind::Stdio(server) => {
            let client = ToolClient::spawn(server).await?;
            Ok(Arc::new(client))
        }
        TransportKind::Local => {
            let client = RateClient::from_env()?;
            let catalog = CurrencyCatalog::load(&client).await?;
            let registry = rate_registry(client, CurrencyResolver::new(Arc::new(catalog)));
            info!("Running rate tools in-process");
            Ok(Arc::new(LocalTransport::new(ToolHandler::new(Arc::new(registry)))))
        }
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .with_state(state)
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

/// The body is read as JSON regardless of content type.
async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DispatchResponse>, ApiError> {
    let request: ChatRequest = serde_json::from_slice(&body).unwrap_or_default();
    let Some(query) = request.text() else {
        return Err(ApiError::MissingQuery);
    };

    let result = state.dispatcher.dispatch(query).await?;
    Ok(Json(result.into()))
}

enum ApiError {
    MissingQuery,
    Dispatch(DispatchError),
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        ApiError::Dispatch(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingQuery => (
                StatusCode::BAD_REQUEST,
                Json(DispatchResponse::error("query is required")),
            )
                .into_response(),
            ApiError::Dispatch(err) => {
                // A reply the selector botched is reported, not a server failure.
                let status = if err.is_malformed_selection() {
                    StatusCode::OK
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                warn!(error = %err, status = status.as_u16(), "Dispatch failed");
                (status, Json(DispatchResponse::error(err.to_string()))).into_response()
            }
        }
    }
}
