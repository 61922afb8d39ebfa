//! `rate-tool-server`: hosts the rate tools over stdin/stdout.
//!
//! Stdout carries the protocol, so all logging goes to stderr.

use std::sync::Arc;

use rate_tools::{rate_registry, CurrencyCatalog, CurrencyResolver, RateClient};
use tool_host::{serve_stdio, ToolHandler};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let client = RateClient::from_env()?;
    info!(provider = %client.base_url(), "Loading currency catalog");

    // The catalog is fetched once; a provider that is down at startup is fatal.
    let catalog = CurrencyCatalog::load(&client).await?;
    let resolver = CurrencyResolver::new(Arc::new(catalog));

    let registry = rate_registry(client, resolver);
    let handler = ToolHandler::new(Arc::new(registry));

    serve_stdio(&handler).await?;
    info!("Tool server shutting down");
    Ok(())
}
