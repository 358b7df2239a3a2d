//! Binance REST payloads.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Entry of `GET /api/v3/ticker/24hr`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    pub symbol: String,
    pub bid_price: Decimal,
    #[serde(default)]
    pub bid_qty: Option<Decimal>,
    pub ask_price: Decimal,
    #[serde(default)]
    pub ask_qty: Option<Decimal>,
    /// 24h volume in quote currency.
    #[serde(default)]
    pub quote_volume: Option<Decimal>,
    /// Window close time, epoch milliseconds.
    #[serde(default)]
    pub close_time: Option<i64>,
}

/// Error body, e.g. `{"code":-1121,"msg":"Invalid symbol."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub code: i64,
    pub msg: String,
}
