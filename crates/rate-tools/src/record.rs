//! Normalized rate records returned by the tools.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A base currency with rates against several targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: String,
    pub date: Option<String>,
    pub rates: IndexMap<String, f64>,
}

/// A single base/target rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRate {
    pub base: String,
    pub target: String,
    pub rate: Option<f64>,
    pub date: Option<String>,
    pub timestamp: Option<i64>,
}

/// Either shape of rate record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateRecord {
    Table(RateTable),
    Pair(PairRate),
}

/// What a tool hands back: one record, or an ordered series of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Record(RateRecord),
    Series(Vec<RateRecord>),
}

impl From<RateTable> for ToolOutput {
    fn from(table: RateTable) -> Self {
        ToolOutput::Record(RateRecord::Table(table))
    }
}

impl From<PairRate> for ToolOutput {
    fn from(pair: PairRate) -> Self {
        ToolOutput::Record(RateRecord::Pair(pair))
    }
}

impl From<Vec<PairRate>> for ToolOutput {
    fn from(series: Vec<PairRate>) -> Self {
        ToolOutput::Series(series.into_iter().map(RateRecord::Pair).collect())
    }
}
