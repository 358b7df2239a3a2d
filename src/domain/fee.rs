//! Per-exchange taker fee schedule.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::error::DomainError;
use super::id::ExchangeId;
use super::quote::Quote;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Taker fee rates as fractions (`0.001` is 0.1%).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeSchedule {
    rates: HashMap<ExchangeId, Decimal>,
}

impl FeeSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fee rate for an exchange.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidFeeRate`] unless `rate` is in `[0, 1)`.
    pub fn with_rate(mut self, exchange: ExchangeId, rate: Decimal) -> Result<Self, DomainError> {
        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            return Err(DomainError::InvalidFeeRate(rate));
        }
        self.rates.insert(exchange, rate);
        Ok(self)
    }

    /// Configured rate for an exchange; zero when the exchange is unknown.
    pub fn rate(&self, exchange: &ExchangeId) -> Decimal {
        self.rates.get(exchange).copied().unwrap_or(Decimal::ZERO)
    }

    /// Rate that applies to a trade against `quote`. A fee reported with the
    /// quote wins over the configured one.
    pub fn rate_for(&self, quote: &Quote) -> Decimal {
        quote
            .fee_rate()
            .unwrap_or_else(|| self.rate(quote.exchange()))
    }

    /// [`rate_for`](Self::rate_for) expressed in percent.
    pub fn percent_for(&self, quote: &Quote) -> Decimal {
        self.rate_for(quote) * HUNDRED
    }
}
