//! Rate provider configuration.

use std::env;

/// Default base URL of the rate provider REST API.
pub const DEFAULT_RATE_API_URL: &str = "http://localhost:8080/api/v1";

/// Where the remote rate provider lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateApiConfig {
    /// Base URL including the API prefix, e.g. `http://localhost:8080/api/v1`.
    pub base_url: String,
}

impl Default for RateApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RATE_API_URL.to_string(),
        }
    }
}

impl RateApiConfig {
    /// Create a config pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read `RATE_API_URL`, falling back to [`DEFAULT_RATE_API_URL`].
    pub fn from_env() -> Self {
        env::var("RATE_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(Self::new)
            .unwrap_or_default()
    }
}
