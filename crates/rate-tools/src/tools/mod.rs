//! The rate tools.
//!
//! Every tool resolves its currency arguments through the shared
//! [`CurrencyResolver`](crate::CurrencyResolver) before calling the provider.
//! Date arguments are passed through untouched.

mod crypto_rates;
mod currency_rates;
mod historical_rates;
mod rate_range;
mod single_exchange_rate;

pub use crypto_rates::CryptoRates;
pub use currency_rates::CurrencyRates;
pub use historical_rates::HistoricalRates;
pub use rate_range::RateRange;
pub use single_exchange_rate::SingleExchangeRate;

use crate::resolver::CurrencyResolver;

fn resolve_all(resolver: &CurrencyResolver, tokens: Vec<String>) -> Vec<String> {
    tokens.iter().map(|t| resolver.resolve(t)).collect()
}
