//! Provider currency catalog.

use indexmap::IndexMap;
use tracing::info;

use crate::client::RateClient;
use crate::error::ToolError;

/// Currency codes and display names known to the provider, in provider order.
///
/// Loaded once at startup and never refreshed.
#[derive(Debug, Clone, Default)]
pub struct CurrencyCatalog {
    entries: IndexMap<String, String>,
}

impl CurrencyCatalog {
    /// Build a catalog from code → name pairs.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(code, name)| (code.into(), name.into()))
                .collect(),
        }
    }

    /// Fetch the catalog from the provider.
    pub async fn load(client: &RateClient) -> Result<Self, ToolError> {
        let entries = client.currencies().await?;
        info!("Loaded {} currencies from rate provider", entries.len());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(code, name)` in provider order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
