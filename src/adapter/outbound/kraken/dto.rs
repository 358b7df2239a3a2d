//! Kraken REST payloads.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Every Kraken public response: errors are reported in the body with a 200.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub error: Vec<String>,
    pub result: Option<T>,
}

/// `GET /0/public/Ticker` result, keyed by Kraken's pair name.
pub type TickerResult = HashMap<String, TickerInfo>;

/// One pair of the ticker result.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerInfo {
    /// Ask `[price, whole lot volume, lot volume]`.
    pub a: Vec<Decimal>,
    /// Bid `[price, whole lot volume, lot volume]`.
    pub b: Vec<Decimal>,
    /// Base volume `[today, last 24 hours]`.
    #[serde(default)]
    pub v: Vec<Decimal>,
}
