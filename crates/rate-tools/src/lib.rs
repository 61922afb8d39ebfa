//! Exchange-rate tools backed by the remote rate provider.
//!
//! This crate provides the currency catalog, the fuzzy [`CurrencyResolver`],
//! a typed [`RateClient`] for the provider's REST API, and a [`ToolRegistry`]
//! holding the five rate tools the orchestrator can select from.
//!
//! # Tools
//!
//! - [`tools::CurrencyRates`] - `get_currency_rates`
//! - [`tools::SingleExchangeRate`] - `get_single_exchange_rate`
//! - [`tools::HistoricalRates`] - `get_historical_rates`
//! - [`tools::RateRange`] - `get_rate_range`
//! - [`tools::CryptoRates`] - `get_crypto_rates`
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rate_tools::{rate_registry, CurrencyCatalog, CurrencyResolver, RateClient};
//!
//! let client = RateClient::from_env()?;
//! let catalog = CurrencyCatalog::load(&client).await?;
//! let registry = rate_registry(client, CurrencyResolver::new(Arc::new(catalog)));
//!
//! let args = r#"{"from_currency": "euro", "to_currency": "dolar"}"#;
//! let output = registry
//!     .execute_json("get_single_exchange_rate", args)
//!     .await?;
//! ```

mod catalog;
mod client;
mod config;
mod error;
mod record;
mod registry;
mod resolver;
mod tool;
pub mod tools;

pub use catalog::CurrencyCatalog;
pub use client::{ProviderPair, ProviderRates, RateClient};
pub use config::{RateApiConfig, DEFAULT_RATE_API_URL};
pub use error::ToolError;
pub use record::{PairRate, RateRecord, RateTable, ToolOutput};
pub use registry::{rate_registry, ToolRegistry};
pub use resolver::{similarity, CurrencyResolver, MATCH_THRESHOLD};
pub use tool::{input_schema, ParamKind, Tool, ToolArgs, ToolDescriptor, ToolParam};
