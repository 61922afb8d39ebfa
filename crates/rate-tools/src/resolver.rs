//! Fuzzy currency resolution.
//!
//! Turns free-form tokens ("dolar", "Turkish Lira", "EUR") into provider
//! codes. Codes are tried before names, and a token nothing resembles is
//! passed through lowercased so the provider can reject it.

use std::sync::Arc;

use similar::TextDiff;

use crate::catalog::CurrencyCatalog;

/// Minimum similarity for a catalog entry to count as a match.
pub const MATCH_THRESHOLD: f32 = 0.6;

/// Resolves user tokens against a [`CurrencyCatalog`].
#[derive(Debug, Clone)]
pub struct CurrencyResolver {
    catalog: Arc<CurrencyCatalog>,
}

impl CurrencyResolver {
    pub fn new(catalog: Arc<CurrencyCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolve a token to a catalog code.
    ///
    /// Returns the code with the catalog's own casing. Without a match
    /// (or for a blank token) the lowercased token comes back unchanged.
    pub fn resolve(&self, token: &str) -> String {
        let needle = token.to_lowercase();
        if needle.trim().is_empty() {
            return needle;
        }

        let codes = self.catalog.iter().map(|(code, _)| (code, code));
        if let Some(code) = best_match(&needle, codes) {
            return code.to_string();
        }

        let by_name = best_match(&needle, self.catalog.iter());
        match by_name {
            Some(code) => code.to_string(),
            None => needle,
        }
    }
}

/// Highest scoring `(code, candidate)` at or above the threshold.
/// Ties keep the candidate seen first.
fn best_match<'a>(
    needle: &str,
    candidates: impl Iterator<Item = (&'a str, &'a str)>,
) -> Option<&'a str> {
    let mut best: Option<(&'a str, f32)> = None;
    for (code, candidate) in candidates {
        let score = similarity(needle, &candidate.to_lowercase());
        if score < MATCH_THRESHOLD {
            continue;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((code, score));
        }
    }
    best.map(|(code, _)| code)
}

/// Character-level similarity ratio: `2 * matches / (len(a) + len(b))`.
pub fn similarity(a: &str, b: &str) -> f32 {
    TextDiff::from_chars(a, b).ratio()
}
