//! Binance spot REST adapter.

mod dto;
mod source;

pub use source::BinanceSource;
