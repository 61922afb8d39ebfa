use std::sync::Arc;

use async_trait::async_trait;

use crate::client::RateClient;
use crate::error::ToolError;
use crate::record::ToolOutput;
use crate::resolver::CurrencyResolver;
use crate::tool::{Tool, ToolArgs, ToolParam};

const PARAMS: &[ToolParam] = &[
    ToolParam::string("base", "Base currency, e.g. \"USD\"", "USD"),
    ToolParam::string("target", "Target currency, e.g. \"TRY\"", "TRY"),
    ToolParam::string("start", "Start date in yyyy-MM-dd format", "2025-08-01"),
    ToolParam::string("end", "End date in yyyy-MM-dd format", "2025-08-30"),
];

/// Daily rate history for one pair over a date range.
///
/// Returns a series in the order the provider sent it, possibly empty.
pub struct RateRange {
    client: Arc<RateClient>,
    resolver: Arc<CurrencyResolver>,
}

impl RateRange {
    pub fn new(client: Arc<RateClient>, resolver: Arc<CurrencyResolver>) -> Self {
        Self { client, resolver }
    }
}

#[async_trait]
impl Tool for RateRange {
    fn name(&self) -> &str {
        "get_rate_range"
    }

    fn description(&self) -> &str {
        "Get exchange rate history for a base-target currency pair over a date range."
    }

    fn params(&self) -> &[ToolParam] {
        PARAMS
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let base = self.resolver.resolve(&args.get_string_or("base", "USD")?);
        let target = self.resolver.resolve(&args.get_string_or("target", "TRY")?);
        let start = args.get_string_or("start", "2025-08-01")?;
        let end = args.get_string_or("end", "2025-08-30")?;

        let series = self.client.rate_range(&base, &target, &start, &end).await?;
        let pairs: Vec<_> = series
            .into_iter()
            .map(|item| item.into_pair(&base, &target))
            .collect();
        Ok(pairs.into())
    }
}
