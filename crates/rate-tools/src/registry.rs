//! Tool registry for managing and executing tools.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::RateClient;
use crate::error::ToolError;
use crate::record::ToolOutput;
use crate::resolver::CurrencyResolver;
use crate::tool::{Tool, ToolArgs, ToolDescriptor};
use crate::tools::{
    CryptoRates, CurrencyRates, HistoricalRates, RateRange, SingleExchangeRate,
};

/// Registry of tools, kept in registration order.
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// Register a tool.
    ///
    /// If a tool with the same name already exists, it will be replaced.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        info!("Registering tool: {}", name);
        self.tools.insert(name, Arc::new(tool));
    }

    /// Get a list of registered tool names.
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Check if a tool is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Descriptors for every tool, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.values().map(|t| t.descriptor()).collect()
    }

    /// Execute a tool by name with the given parameters.
    pub async fn execute(
        &self,
        name: &str,
        params: HashMap<String, Value>,
    ) -> Result<ToolOutput, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        debug!("Executing tool '{}' with {} params", name, params.len());

        let result = tool.execute(ToolArgs::new(params)).await?;

        debug!("Tool '{}' completed", name);

        Ok(result)
    }

    /// Execute a tool with a JSON arguments string.
    pub async fn execute_json(
        &self,
        name: &str,
        args_json: &str,
    ) -> Result<ToolOutput, ToolError> {
        let params: HashMap<String, Value> = serde_json::from_str(args_json)?;
        self.execute(name, params).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry holding the five rate tools, all sharing one client and resolver.
pub fn rate_registry(client: RateClient, resolver: CurrencyResolver) -> ToolRegistry {
    let client = Arc::new(client);
    let resolver = Arc::new(resolver);

    let mut registry = ToolRegistry::new();
    registry.register(CurrencyRates::new(client.clone(), resolver.clone()));
    registry.register(SingleExchangeRate::new(client.clone(), resolver.clone()));
    registry.register(HistoricalRates::new(client.clone(), resolver.clone()));
    registry.register(RateRange::new(client.clone(), resolver.clone()));
    registry.register(CryptoRates::new(client, resolver));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CurrencyCatalog;
    use crate::config::RateApiConfig;
    use crate::record::PairRate;
    use crate::tool::ToolParam;
    use async_trait::async_trait;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes the base back as a pair"
        }

        fn params(&self) -> &[ToolParam] {
            const PARAMS: &[ToolParam] = &[ToolParam::string("base", "Base", "eur")];
            PARAMS
        }

        async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
            let base = args.get_string_or("base", "eur")?;
            Ok(PairRate {
                base: base.clone(),
                target: base,
                rate: Some(1.0),
                date: None,
                timestamp: None,
            }
            .into())
        }
    }

    #[tokio::test]
    async fn test_registry_basic() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        assert!(registry.has_tool("echo"));
        assert!(!registry.has_tool("nonexistent"));
        assert_eq!(registry.list_tools(), vec!["echo"]);
        let descriptors = registry.descriptors();
        assert_eq!(
            descriptors[0].input_schema["properties"]["base"]["default"],
            "eur"
        );
    }

    #[tokio::test]
    async fn test_registry_execute_json() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let result = registry.execute_json("echo", r#"{"base": "usd"}"#).await.unwrap();
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(value["target"], "usd");
    }

    #[tokio::test]
    async fn test_registry_not_found() {
        let registry = ToolRegistry::new();
        let result = registry.execute("nonexistent", HashMap::new()).await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }

    #[test]
    fn test_rate_registry_catalog() {
        let client = RateClient::new(&RateApiConfig::default()).unwrap();
        let resolver = CurrencyResolver::new(Arc::new(CurrencyCatalog::default()));
        let registry = rate_registry(client, resolver);

        assert_eq!(
            registry.list_tools(),
            vec![
                "get_currency_rates",
                "get_single_exchange_rate",
                "get_historical_rates",
                "get_rate_range",
                "get_crypto_rates",
            ]
        );
        for descriptor in registry.descriptors() {
            assert!(!descriptor.description.is_empty());
            assert_eq!(descriptor.input_schema["type"], "object");
        }
    }
}
