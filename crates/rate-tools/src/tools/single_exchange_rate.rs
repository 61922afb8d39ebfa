use std::sync::Arc;

use async_trait::async_trait;

use crate::client::RateClient;
use crate::error::ToolError;
use crate::record::ToolOutput;
use crate::resolver::CurrencyResolver;
use crate::tool::{Tool, ToolArgs, ToolParam};

const PARAMS: &[ToolParam] = &[
    ToolParam::string("from_currency", "Base currency, e.g. \"EUR\"", "EUR"),
    ToolParam::string("to_currency", "Target currency, e.g. \"USD\"", "USD"),
];

/// Rate for a single currency pair.
pub struct SingleExchangeRate {
    client: Arc<RateClient>,
    resolver: Arc<CurrencyResolver>,
}

impl SingleExchangeRate {
    pub fn new(client: Arc<RateClient>, resolver: Arc<CurrencyResolver>) -> Self {
        Self { client, resolver }
    }
}

#[async_trait]
impl Tool for SingleExchangeRate {
    fn name(&self) -> &str {
        "get_single_exchange_rate"
    }

    fn description(&self) -> &str {
        "Get exchange rate for a single currency pair."
    }

    fn params(&self) -> &[ToolParam] {
        PARAMS
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let from = self.resolver.resolve(&args.get_string_or("from_currency", "EUR")?);
        let to = self.resolver.resolve(&args.get_string_or("to_currency", "USD")?);

        let pair = self.client.pair_rate(&from, &to).await?;
        Ok(pair.into_pair(&from, &to).into())
    }
}
