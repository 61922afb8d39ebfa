use std::sync::Arc;

use async_trait::async_trait;

use super::resolve_all;
use crate::client::RateClient;
use crate::error::ToolError;
use crate::record::ToolOutput;
use crate::resolver::CurrencyResolver;
use crate::tool::{Tool, ToolArgs, ToolParam};

const PARAMS: &[ToolParam] = &[
    ToolParam::string("base", "Base cryptocurrency code, e.g. \"BTC\"", "BTC"),
    ToolParam::string_list(
        "targets",
        "Optional list of target cryptocurrencies, e.g. [\"ETH\", \"LTC\"]",
    ),
];

/// Rates for a base cryptocurrency. Same shape as [`super::CurrencyRates`].
pub struct CryptoRates {
    client: Arc<RateClient>,
    resolver: Arc<CurrencyResolver>,
}

impl CryptoRates {
    pub fn new(client: Arc<RateClient>, resolver: Arc<CurrencyResolver>) -> Self {
        Self { client, resolver }
    }
}

#[async_trait]
impl Tool for CryptoRates {
    fn name(&self) -> &str {
        "get_crypto_rates"
    }

    fn description(&self) -> &str {
        "Get cryptocurrency exchange rates for a base crypto currency."
    }

    fn params(&self) -> &[ToolParam] {
        PARAMS
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let base = self.resolver.resolve(&args.get_string_or("base", "BTC")?);
        let targets = resolve_all(&self.resolver, args.get_string_list("targets")?);

        let rates = self.client.crypto_rates(&base, &targets).await?;
        Ok(rates.into_table(&base, None).into())
    }
}
