//! HTTP client for the remote rate provider.
//!
//! Every endpoint wraps its payload as `{"data": ...}` next to bookkeeping
//! fields (`success`, `message`, `timestamp`) that we ignore. A non-success
//! status is reported as [`ToolError::Provider`] and never retried.

use indexmap::IndexMap;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::RateApiConfig;
use crate::error::ToolError;
use crate::record::{PairRate, RateTable};

/// Response envelope shared by every provider endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

/// Rates-by-base payload as the provider sends it. Every field may be absent.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderRates {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub rates: Option<IndexMap<String, f64>>,
}

impl ProviderRates {
    /// Shape into a [`RateTable`], filling gaps from the request.
    pub fn into_table(self, base: &str, requested_date: Option<&str>) -> RateTable {
        RateTable {
            base: self.base.unwrap_or_else(|| base.to_string()),
            date: self.date.or_else(|| requested_date.map(str::to_string)),
            rates: self.rates.unwrap_or_default(),
        }
    }
}

/// Single-pair payload as the provider sends it.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderPair {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl ProviderPair {
    /// Shape into a [`PairRate`], filling codes from the request.
    pub fn into_pair(self, base: &str, target: &str) -> PairRate {
        PairRate {
            base: self.base.unwrap_or_else(|| base.to_string()),
            target: self.target.unwrap_or_else(|| target.to_string()),
            rate: self.rate,
            date: self.date,
            timestamp: self.timestamp,
        }
    }
}

/// Client for the rate provider REST API.
#[derive(Debug, Clone)]
pub struct RateClient {
    http: Client,
    base_url: Url,
}

impl RateClient {
    /// Create a client for the configured provider.
    pub fn new(config: &RateApiConfig) -> Result<Self, ToolError> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ToolError::Configuration(format!(
                "rate provider URL cannot carry a path: {}",
                config.base_url
            )));
        }

        let http = Client::builder()
            .user_agent(concat!("rate-tools/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ToolError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { http, base_url })
    }

    /// Create a client from `RATE_API_URL`.
    pub fn from_env() -> Result<Self, ToolError> {
        Self::new(&RateApiConfig::from_env())
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET currencies`: code → display name, in provider order.
    pub async fn currencies(&self) -> Result<IndexMap<String, String>, ToolError> {
        let url = self.endpoint(&["currencies"], &[])?;
        Ok(self.get(url).await?.unwrap_or_default())
    }

    /// `GET rates/{base}?targets=a,b`.
    pub async fn rates_by_base(
        &self,
        base: &str,
        targets: &[String],
    ) -> Result<ProviderRates, ToolError> {
        let query = targets_query(targets);
        let url = self.endpoint(&["rates", base], &query)?;
        Ok(self.get(url).await?.unwrap_or_default())
    }

    /// `GET rate?from=&to=`.
    pub async fn pair_rate(&self, from: &str, to: &str) -> Result<ProviderPair, ToolError> {
        let query = [("from", from.to_string()), ("to", to.to_string())];
        let url = self.endpoint(&["rate"], &query)?;
        Ok(self.get(url).await?.unwrap_or_default())
    }

    /// `GET rates/{base}/{date}`.
    pub async fn historical_rates(
        &self,
        base: &str,
        date: &str,
    ) -> Result<ProviderRates, ToolError> {
        let url = self.endpoint(&["rates", base, date], &[])?;
        Ok(self.get(url).await?.unwrap_or_default())
    }

    /// `GET rates/{base}/{target}/range?start=&end=`, in provider order.
    pub async fn rate_range(
        &self,
        base: &str,
        target: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<ProviderPair>, ToolError> {
        let url = self.endpoint(
            &["rates", base, target, "range"],
            &[("start", start.to_string()), ("end", end.to_string())],
        )?;
        Ok(self.get(url).await?.unwrap_or_default())
    }

    /// `GET crypto/{base}?targets=a,b`.
    pub async fn crypto_rates(
        &self,
        base: &str,
        targets: &[String],
    ) -> Result<ProviderRates, ToolError> {
        let query = targets_query(targets);
        let url = self.endpoint(&["crypto", base], &query)?;
        Ok(self.get(url).await?.unwrap_or_default())
    }

    /// Build an endpoint URL with percent-encoded path segments.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ToolError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ToolError::Configuration("rate provider URL cannot carry a path".to_string())
            })?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, ToolError> {
        debug!("Fetching rates from: {}", url);

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }
}

fn targets_query(targets: &[String]) -> Vec<(&'static str, String)> {
    if targets.is_empty() {
        Vec::new()
    } else {
        vec![("targets", targets.join(","))]
    }
}
