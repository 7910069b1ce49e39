//! Trading signals emitted by strategies.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::bar::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Buy,
    Sell,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Buy => write!(f, "buy"),
            SignalKind::Sell => write!(f, "sell"),
        }
    }
}

/// Chart panel a signal belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartPanel {
    Main,
    Rsi,
    Macd,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DetailValue {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailValue::Number(v) => write!(f, "{:.2}", v),
            DetailValue::Text(s) => write!(f, "{}", s),
            DetailValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for DetailValue {
    fn from(v: f64) -> Self {
        DetailValue::Number(v)
    }
}

impl From<&str> for DetailValue {
    fn from(s: &str) -> Self {
        DetailValue::Text(s.to_string())
    }
}

impl From<bool> for DetailValue {
    fn from(b: bool) -> Self {
        DetailValue::Flag(b)
    }
}

pub type Details = BTreeMap<String, DetailValue>;

/// Builds a `Details` map from `(key, value)` pairs.
pub fn details<const N: usize>(pairs: [(&str, DetailValue); N]) -> Details {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub strategy: String,
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub price: f64,
    pub timestamp: NaiveDateTime,
    pub panel: ChartPanel,
    pub details: Details,
}

impl Signal {
    pub fn is_buy(&self) -> bool {
        self.kind == SignalKind::Buy
    }

    pub fn detail(&self, key: &str) -> Option<&DetailValue> {
        self.details.get(key)
    }

    pub fn detail_number(&self, key: &str) -> Option<f64> {
        match self.details.get(key) {
            Some(DetailValue::Number(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Live-mode result for one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSignals {
    pub id: String,
    pub name: String,
    pub last_bar: Option<Bar>,
    /// When the data source last refreshed this item, if it says.
    pub last_updated: Option<String>,
    pub signals: Vec<Signal>,
}
