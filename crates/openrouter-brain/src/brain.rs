//! OpenRouterBrain implementation using the chat-completions API.

use brain_core::{async_trait, hash_prompt, Brain, BrainError};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::OpenRouterBrainConfig;

/// A stateless brain backed by OpenRouter.
///
/// Every call is a fresh two-message conversation (system + user); no
/// history is kept between prompts.
pub struct OpenRouterBrain {
    client: Client,
    config: OpenRouterBrainConfig,
}

impl OpenRouterBrain {
    /// Create a new OpenRouterBrain with the given configuration.
    pub fn new(config: OpenRouterBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration(
                "OpenRouter API key is empty".to_string(),
            ));
        }

        let client = Client::builder().build().map_err(|e| {
            BrainError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        if let Some(ref prompt) = config.system_prompt {
            info!(
                "OpenRouterBrain system prompt fingerprint: {}",
                hash_prompt(prompt)
            );
        }
        info!(
            "OpenRouterBrain initialized with model: {}, temperature: {:?}",
            config.model, config.temperature
        );

        Ok(Self { client, config })
    }

    /// Create an OpenRouterBrain from environment variables.
    ///
    /// See [`OpenRouterBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(OpenRouterBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenRouterBrainConfig {
        &self.config
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref system_prompt) = self.config.system_prompt {
            messages.push(ChatMessage::system(system_prompt.clone()));
        }
        messages.push(ChatMessage::user(prompt));

        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

/// Pull the reply text out of a completion, trimmed.
fn completion_text(completion: ChatCompletionResponse) -> Result<String, BrainError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| {
            BrainError::ProcessingFailed("No content in completion response".to_string())
        })
}

#[async_trait]
impl Brain for OpenRouterBrain {
    async fn generate(&self, prompt: &str) -> Result<String, BrainError> {
        let request = self.build_request(prompt);
        debug!("Sending request to OpenRouter: model={}", request.model);

        let response = self
            .client
            .post(self.config.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&request)
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

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            BrainError::ProcessingFailed(format!("Failed to parse response: {}", e))
        })?;

        if let Some(ref usage) = completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion_text(completion)
    }

    fn name(&self) -> &str {
        "OpenRouter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    fn brain() -> OpenRouterBrain {
        let config = OpenRouterBrainConfig::builder().api_key("test-key").build();
        OpenRouterBrain::new(config).unwrap()
    }

    #[test]
    fn test_empty_key_rejected() {
        let config = OpenRouterBrainConfig::builder().api_key("").build();
        assert!(matches!(
            OpenRouterBrain::new(config),
            Err(BrainError::Configuration(_))
        ));
    }

    #[test]
    fn test_build_request_includes_system_prompt() {
        let request = brain().build_request("pick a tool");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "pick a tool");
        assert_eq!(request.temperature, Some(0.2));
    }

    #[test]
    fn test_build_request_without_system_prompt() {
        let config = OpenRouterBrainConfig::builder()
            .api_key("k")
            .no_system_prompt()
            .build();
        let request = OpenRouterBrain::new(config).unwrap().build_request("hi");
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn test_completion_text_trims() {
        let completion: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "  {\"tool\": \"x\"}\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(completion_text(completion).unwrap(), r#"{"tool": "x"}"#);
    }

    #[test]
    fn test_completion_text_missing_content() {
        let completion: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            completion_text(completion),
            Err(BrainError::ProcessingFailed(_))
        ));
    }

    #[test]
    fn test_brain_name() {
        assert_eq!(brain().name(), "OpenRouter");
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/v1", addr)
    }

    fn brain_at(url: String) -> OpenRouterBrain {
        let config = OpenRouterBrainConfig::builder()
            .api_key("or-key")
            .api_url(url)
            .model("test/model")
            .build();
        OpenRouterBrain::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_generate_sends_headers_and_sampling() {
        let app = Router::new().route(
            "/api/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers.get("authorization").unwrap(), "Bearer or-key");
                assert_eq!(headers.get("http-referer").unwrap(), "http://localhost");
                assert_eq!(headers.get("x-title").unwrap(), "Rate Dispatch");

                assert_eq!(body["model"], "test/model");
                assert_eq!(body["temperature"].as_f64().unwrap() as f32, 0.2);
                assert_eq!(body["max_tokens"], 250);
                assert_eq!(body["messages"][0]["role"], "system");
                assert_eq!(body["messages"][1]["role"], "user");

                let prompt = body["messages"][1]["content"].as_str().unwrap();
                let content = format!(" picked: {} ", prompt);
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": content}}],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 3}
                }))
            }),
        );
        let brain = brain_at(spawn(app).await);

        let reply = brain.generate("euro to dollar").await.unwrap();
        assert_eq!(reply, "picked: euro to dollar");
    }

    #[tokio::test]
    async fn test_generate_surfaces_api_error() {
        let app = Router::new().route(
            "/api/v1/chat/completions",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"error": {"message": "Rate limit exceeded", "code": 429}})),
                )
            }),
        );
        let brain = brain_at(spawn(app).await);

        match brain.generate("hi").await {
            Err(BrainError::ProcessingFailed(msg)) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("Rate limit exceeded"));
            }
            other => panic!("Expected ProcessingFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_plain_text_error_body() {
        let app = Router::new().route(
            "/api/v1/chat/completions",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") }),
        );
        let brain = brain_at(spawn(app).await);

        match brain.generate("hi").await {
            Err(BrainError::ProcessingFailed(msg)) => {
                assert_eq!(msg, "API error (502): upstream unavailable");
            }
            other => panic!("Expected ProcessingFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_network_error() {
        // Port 9 (discard) on loopback is not expected to accept HTTP.
        let brain = brain_at("http://127.0.0.1:9/api/v1".to_string());
        assert!(matches!(
            brain.generate("hi").await,
            Err(BrainError::Network(_))
        ));
    }
}
