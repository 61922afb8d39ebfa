use std::sync::Arc;

use async_trait::async_trait;

use crate::client::RateClient;
use crate::error::ToolError;
use crate::record::ToolOutput;
use crate::resolver::CurrencyResolver;
use crate::tool::{Tool, ToolArgs, ToolParam};

const PARAMS: &[ToolParam] = &[
    ToolParam::string("base", "Base currency code, e.g. \"EUR\"", "EUR"),
    ToolParam::string("date", "Date in yyyy-MM-dd format, e.g. \"2025-08-29\"", "2025-08-29"),
];

/// Rates for a base currency on a given day.
///
/// The date is sent to the provider as given; it decides what a valid date is.
pub struct HistoricalRates {
    client: Arc<RateClient>,
    resolver: Arc<CurrencyResolver>,
}

impl HistoricalRates {
    pub fn new(client: Arc<RateClient>, resolver: Arc<CurrencyResolver>) -> Self {
        Self { client, resolver }
    }
}

#[async_trait]
impl Tool for HistoricalRates {
    fn name(&self) -> &str {
        "get_historical_rates"
    }

    fn description(&self) -> &str {
        "Get historical exchange rates for a specific base currency and date."
    }

    fn params(&self) -> &[ToolParam] {
        PARAMS
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let base = self.resolver.resolve(&args.get_string_or("base", "EUR")?);
        let date = args.get_string_or("date", "2025-08-29")?;

        let rates = self.client.historical_rates(&base, &date).await?;
        Ok(rates.into_table(&base, Some(&date)).into())
    }
}
