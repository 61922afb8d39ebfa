//! Configuration for OpenRouterBrain.

use brain_core::BrainError;
use std::env;

const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-exp:free";
const DEFAULT_SYSTEM_PROMPT: &str = "You are an intelligent assistant. Execute tasks as prompted.";
const DEFAULT_REFERER: &str = "http://localhost";
const DEFAULT_TITLE: &str = "Rate Dispatch";

/// Configuration for OpenRouterBrain.
#[derive(Debug, Clone)]
pub struct OpenRouterBrainConfig {
    /// Base API URL (without `/chat/completions`).
    pub api_url: String,

    /// API key for bearer authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// System message sent ahead of every prompt.
    pub system_prompt: Option<String>,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation. Kept low so selections stay parseable.
    pub temperature: Option<f32>,

    /// `HTTP-Referer` attribution header.
    pub referer: String,

    /// `X-Title` attribution header.
    pub title: String,
}

impl Default for OpenRouterBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
            max_tokens: Some(250),
            temperature: Some(0.2),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl OpenRouterBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENROUTER_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENROUTER_API_URL` - API URL (default: https://openrouter.ai/api/v1)
    /// - `OPENROUTER_MODEL` - Model name (default: google/gemini-2.0-flash-exp:free)
    /// - `OPENROUTER_SYSTEM_PROMPT` - System message
    /// - `OPENROUTER_MAX_TOKENS` - Max tokens (default: 250)
    /// - `OPENROUTER_TEMPERATURE` - Temperature (default: 0.2)
    /// - `OPENROUTER_REFERER` - Attribution referer (default: http://localhost)
    /// - `OPENROUTER_TITLE` - Attribution title (default: Rate Dispatch)
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                BrainError::Configuration(
                    "OPENROUTER_API_KEY environment variable not set".to_string(),
                )
            })?;

        let defaults = Self::default();

        let api_url = env::var("OPENROUTER_API_URL").unwrap_or(defaults.api_url);
        let model = env::var("OPENROUTER_MODEL").unwrap_or(defaults.model);
        let system_prompt = env::var("OPENROUTER_SYSTEM_PROMPT")
            .ok()
            .or(defaults.system_prompt);

        let max_tokens = env::var("OPENROUTER_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.max_tokens);

        let temperature = env::var("OPENROUTER_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.temperature);

        let referer = env::var("OPENROUTER_REFERER").unwrap_or(defaults.referer);
        let title = env::var("OPENROUTER_TITLE").unwrap_or(defaults.title);

        Ok(Self {
            api_url,
            api_key,
            model,
            system_prompt,
            max_tokens,
            temperature,
            referer,
            title,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OpenRouterBrainConfigBuilder {
        OpenRouterBrainConfigBuilder::default()
    }

    /// Full chat-completions endpoint URL.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

/// Builder for OpenRouterBrainConfig.
#[derive(Debug, Default)]
pub struct OpenRouterBrainConfigBuilder {
    config: OpenRouterBrainConfig,
}

impl OpenRouterBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Send prompts without a system message.
    pub fn no_system_prompt(mut self) -> Self {
        self.config.system_prompt = None;
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenRouterBrainConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenRouterBrainConfig::default();

        assert_eq!(config.api_url, "https://openrouter.ai/api/v1");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "google/gemini-2.0-flash-exp:free");
        assert_eq!(config.max_tokens, Some(250));
        assert_eq!(config.temperature, Some(0.2));
        assert!(config.system_prompt.is_some());
    }

    #[test]
    fn test_completions_url_trims_slash() {
        let config = OpenRouterBrainConfig::builder()
            .api_url("http://127.0.0.1:9000/v1/")
            .build();
        assert_eq!(config.completions_url(), "http://127.0.0.1:9000/v1/chat/completions");
    }

    #[test]
    fn test_builder_all_options() {
        let config = OpenRouterBrainConfig::builder()
            .api_key("my-key")
            .model("meta/llama")
            .no_system_prompt()
            .max_tokens(64)
            .temperature(0.0)
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.model, "meta/llama");
        assert!(config.system_prompt.is_none());
        assert_eq!(config.max_tokens, Some(64));
        assert_eq!(config.temperature, Some(0.0));
    }

    // Env vars are process-global, so every scenario runs inside one test.
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all() {
            for key in [
                "OPENROUTER_API_KEY",
                "OPENROUTER_API_URL",
                "OPENROUTER_MODEL",
                "OPENROUTER_SYSTEM_PROMPT",
                "OPENROUTER_MAX_TOKENS",
                "OPENROUTER_TEMPERATURE",
                "OPENROUTER_REFERER",
                "OPENROUTER_TITLE",
            ] {
                std::env::remove_var(key);
            }
        }

        clear_all();
        match OpenRouterBrainConfig::from_env() {
            Err(BrainError::Configuration(msg)) => assert!(msg.contains("OPENROUTER_API_KEY")),
            other => panic!("Expected Configuration error, got {:?}", other.map(|c| c.model)),
        }

        clear_all();
        std::env::set_var("OPENROUTER_API_KEY", "   ");
        assert!(OpenRouterBrainConfig::from_env().is_err());

        clear_all();
        std::env::set_var("OPENROUTER_API_KEY", "or-key");
        std::env::set_var("OPENROUTER_TEMPERATURE", "0.5");
        std::env::set_var("OPENROUTER_MAX_TOKENS", "not-a-number");
        let config = OpenRouterBrainConfig::from_env().unwrap();
        assert_eq!(config.api_key, "or-key");
        assert_eq!(config.temperature, Some(0.5));
        assert_eq!(config.max_tokens, Some(250));
        assert_eq!(config.api_url, "https://openrouter.ai/api/v1");

        clear_all();
    }
}
