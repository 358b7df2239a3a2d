//! Builders for domain primitives used across tests.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{ExchangeId, Quote, Symbol};

/// Parse a canonical symbol, panicking on malformed input.
pub fn symbol(s: &str) -> Symbol {
    Symbol::parse(s).unwrap_or_else(|e| panic!("bad test symbol {s:?}: {e}"))
}

pub fn symbols(list: &[&str]) -> Vec<Symbol> {
    list.iter().map(|s| symbol(s)).collect()
}

pub fn exchange(id: &str) -> ExchangeId {
    ExchangeId::new(id)
}

/// A quote timestamped now.
pub fn quote(exchange: &str, symbol_str: &str, bid: Decimal, ask: Decimal) -> Quote {
    quote_at(exchange, symbol_str, bid, ask, Utc::now())
}

pub fn quote_at(
    exchange: &str,
    symbol_str: &str,
    bid: Decimal,
    ask: Decimal,
    at: DateTime<Utc>,
) -> Quote {
    Quote::builder(ExchangeId::new(exchange), symbol(symbol_str))
        .bid(bid)
        .ask(ask)
        .timestamp(at)
        .build()
        .unwrap_or_else(|e| panic!("bad test quote: {e}"))
}
