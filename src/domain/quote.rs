//! Normalized top-of-book quote.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::DomainError;
use super::id::{ExchangeId, Symbol};

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Size or volume represented as a Decimal for precision.
pub type Volume = Decimal;

/// Best bid/ask for one symbol on one exchange.
///
/// Immutable once built. Construction through [`QuoteBuilder`] guarantees
/// positive prices and `bid <= ask`; a newer fetch supersedes the value
/// rather than mutating it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    exchange: ExchangeId,
    symbol: Symbol,
    bid: Price,
    ask: Price,
    bid_size: Option<Volume>,
    ask_size: Option<Volume>,
    volume_24h: Option<Volume>,
    timestamp: DateTime<Utc>,
    fee_rate: Option<Decimal>,
}

impl Quote {
    /// Start building a quote for `symbol` on `exchange`.
    pub fn builder(exchange: ExchangeId, symbol: Symbol) -> QuoteBuilder {
        QuoteBuilder {
            exchange,
            symbol,
            bid: None,
            ask: None,
            bid_size: None,
            ask_size: None,
            volume_24h: None,
            timestamp: None,
            fee_rate: None,
        }
    }

    pub fn exchange(&self) -> &ExchangeId {
        &self.exchange
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn bid(&self) -> Price {
        self.bid
    }

    pub fn ask(&self) -> Price {
        self.ask
    }

    /// Size available at the best bid, if the exchange reports it.
    pub fn bid_size(&self) -> Option<Volume> {
        self.bid_size
    }

    /// Size available at the best ask, if the exchange reports it.
    pub fn ask_size(&self) -> Option<Volume> {
        self.ask_size
    }

    /// Rolling 24h traded volume, if the exchange reports it.
    pub fn volume_24h(&self) -> Option<Volume> {
        self.volume_24h
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Taker fee override reported alongside the quote.
    pub fn fee_rate(&self) -> Option<Decimal> {
        self.fee_rate
    }

    /// Midpoint of bid and ask.
    pub fn mid(&self) -> Price {
        // bid <= ask, so neither step can overflow.
        self.bid + (self.ask - self.bid) / Decimal::TWO
    }

    /// Age of the quote relative to `now`. Timestamps ahead of `now` count as zero.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.timestamp).max(Duration::zero())
    }

    /// Returns true if the quote is no older than `window`.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.age(now) <= window
    }
}

/// Builder for [`Quote`]; validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct QuoteBuilder {
    exchange: ExchangeId,
    symbol: Symbol,
    bid: Option<Price>,
    ask: Option<Price>,
    bid_size: Option<Volume>,
    ask_size: Option<Volume>,
    volume_24h: Option<Volume>,
    timestamp: Option<DateTime<Utc>>,
    fee_rate: Option<Decimal>,
}

impl QuoteBuilder {
    pub fn bid(mut self, bid: Price) -> Self {
        self.bid = Some(bid);
        self
    }

    pub fn ask(mut self, ask: Price) -> Self {
        self.ask = Some(ask);
        self
    }

    pub fn bid_size(mut self, size: Volume) -> Self {
        self.bid_size = Some(size);
        self
    }

    pub fn ask_size(mut self, size: Volume) -> Self {
        self.ask_size = Some(size);
        self
    }

    pub fn volume_24h(mut self, volume: Volume) -> Self {
        self.volume_24h = Some(volume);
        self
    }

    /// Exchange timestamp. Defaults to the build time when not set.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn fee_rate(mut self, fee_rate: Decimal) -> Self {
        self.fee_rate = Some(fee_rate);
        self
    }

    /// Validate and build the quote.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] for missing or non-positive prices, a bid
    /// above the ask, negative sizes, or a fee rate outside `[0, 1)`.
    pub fn build(self) -> Result<Quote, DomainError> {
        let bid = self.bid.ok_or(DomainError::MissingField("bid"))?;
        let ask = self.ask.ok_or(DomainError::MissingField("ask"))?;

        if bid <= Decimal::ZERO {
            return Err(DomainError::NonPositivePrice {
                field: "bid",
                value: bid,
            });
        }
        if ask <= Decimal::ZERO {
            return Err(DomainError::NonPositivePrice {
                field: "ask",
                value: ask,
            });
        }
        if bid > ask {
            return Err(DomainError::CrossedQuote { bid, ask });
        }

        for (field, value) in [
            ("bid_size", self.bid_size),
            ("ask_size", self.ask_size),
            ("volume_24h", self.volume_24h),
        ] {
            if let Some(value) = value.filter(|v| v.is_sign_negative() && !v.is_zero()) {
                return Err(DomainError::NegativeAmount { field, value });
            }
        }

        if let Some(rate) = self.fee_rate {
            if (rate.is_sign_negative() && !rate.is_zero()) || rate >= Decimal::ONE {
                return Err(DomainError::InvalidFeeRate(rate));
            }
        }

        Ok(Quote {
            exchange: self.exchange,
            symbol: self.symbol,
            bid,
            ask,
            bid_size: self.bid_size,
            ask_size: self.ask_size,
            volume_24h: self.volume_24h,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            fee_rate: self.fee_rate,
        })
    }
}
