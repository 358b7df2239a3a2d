//! Runtime caches and trackers used by the detector.
//!
//! - [`quote::QuoteCache`]: latest quote per (exchange, symbol) with freshness
//! - [`history::PriceHistory`]: bounded mid-price history for volatility
//! - [`cooldown::Cooldowns`]: symbols temporarily disabled after fatal errors

pub mod cooldown;
pub mod history;
pub mod quote;

pub use cooldown::Cooldowns;
pub use history::PriceHistory;
pub use quote::{QuoteCache, QuoteCacheEntry, QuoteSnapshot};
