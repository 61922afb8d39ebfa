//! GeminiBrain implementation.

use brain_core::{async_trait, Brain, BrainError};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiError, GenerateContentRequest, GenerateContentResponse};
use crate::config::GeminiBrainConfig;

/// A stateless brain backed by Gemini `generateContent`.
pub struct GeminiBrain {
    client: Client,
    config: GeminiBrainConfig,
}

impl GeminiBrain {
    /// Create a new GeminiBrain with the given configuration.
    pub fn new(config: GeminiBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration("Gemini API key is empty".to_string()));
        }

        let client = Client::builder().build().map_err(|e| {
            BrainError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!("GeminiBrain initialized with model: {}", config.model);

        Ok(Self { client, config })
    }

    /// Create a GeminiBrain from environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(GeminiBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiBrainConfig {
        &self.config
    }
}

#[async_trait]
impl Brain for GeminiBrain {
    async fn generate(&self, prompt: &str) -> Result<String, BrainError> {
        let url = self.config.generate_url();
        debug!("Sending prompt to Gemini ({} chars)", prompt.len());

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("X-goog-api-key", &self.config.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&error_text)
                .map(|api_error| api_error.error.message)
                .unwrap_or(error_text);
            return Err(BrainError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                message
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            BrainError::ProcessingFailed(format!("Failed to parse response: {}", e))
        })?;

        body.first_text().ok_or_else(|| {
            BrainError::ProcessingFailed("No candidates in response".to_string())
        })
    }

    fn name(&self) -> &str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1beta", addr)
    }

    #[tokio::test]
    async fn test_generate_reads_first_candidate() {
        let app = Router::new().route(
            "/v1beta/models/*rest",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers.get("x-goog-api-key").unwrap(), "g-key");
                let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
                let text = format!("narrated: {}", prompt);
                Json(json!({
                    "candidates": [{"content": {"parts": [{"text": text}]}}]
                }))
            }),
        );
        let url = spawn(app).await;

        let config = GeminiBrainConfig::new("g-key").with_api_url(url);
        let brain = GeminiBrain::new(config).unwrap();
        let reply = brain.generate("1 EUR = 1.08 USD").await.unwrap();
        assert_eq!(reply, "narrated: 1 EUR = 1.08 USD");
    }

    #[tokio::test]
    async fn test_generate_surfaces_api_error() {
        let app = Router::new().route(
            "/v1beta/models/*rest",
            post(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({"error": {"code": 403, "message": "API key not valid"}})),
                )
            }),
        );
        let url = spawn(app).await;

        let config = GeminiBrainConfig::new("bad").with_api_url(url);
        let brain = GeminiBrain::new(config).unwrap();
        match brain.generate("hi").await {
            Err(BrainError::ProcessingFailed(msg)) => {
                assert!(msg.contains("403"));
                assert!(msg.contains("API key not valid"));
            }
            other => panic!("Expected ProcessingFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_network_error() {
        // Port 9 (discard) on loopback is not expected to accept HTTP.
        let config = GeminiBrainConfig::new("k").with_api_url("http://127.0.0.1:9/v1beta");
        let brain = GeminiBrain::new(config).unwrap();
        assert!(matches!(
            brain.generate("hi").await,
            Err(BrainError::Network(_))
        ));
    }

    #[test]
    fn test_first_text_empty() {
        let body: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(body.first_text().is_none());
    }
}
