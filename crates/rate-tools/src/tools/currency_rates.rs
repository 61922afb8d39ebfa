use std::sync::Arc;

use async_trait::async_trait;

use super::resolve_all;
use crate::client::RateClient;
use crate::error::ToolError;
use crate::record::ToolOutput;
use crate::resolver::CurrencyResolver;
use crate::tool::{Tool, ToolArgs, ToolParam};

const PARAMS: &[ToolParam] = &[
    ToolParam::string("base", "Base currency code, e.g. \"eur\"", "eur"),
    ToolParam::string_list(
        "targets",
        "Optional list of target currencies, e.g. [\"USD\", \"TRY\"]",
    ),
];

/// Current rates for a base currency, optionally narrowed to some targets.
///
/// # Examples
///
/// ```json
/// {"base": "eur"}
/// {"base": "euro", "targets": ["dollar", "TRY"]}
/// ```
pub struct CurrencyRates {
    client: Arc<RateClient>,
    resolver: Arc<CurrencyResolver>,
}

impl CurrencyRates {
    pub fn new(client: Arc<RateClient>, resolver: Arc<CurrencyResolver>) -> Self {
        Self { client, resolver }
    }
}

#[async_trait]
impl Tool for CurrencyRates {
    fn name(&self) -> &str {
        "get_currency_rates"
    }

    fn description(&self) -> &str {
        "Get exchange rates by base currency."
    }

    fn params(&self) -> &[ToolParam] {
        PARAMS
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let base = self.resolver.resolve(&args.get_string_or("base", "eur")?);
        let targets = resolve_all(&self.resolver, args.get_string_list("targets")?);

        let rates = self.client.rates_by_base(&base, &targets).await?;
        Ok(rates.into_table(&base, None).into())
    }
}
