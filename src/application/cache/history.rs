//! Bounded mid-price history for volatility estimates.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::prelude::ToPrimitive;

use crate::domain::{ExchangeId, Quote, Symbol};

/// Last `capacity` mid prices per (exchange, symbol).
pub struct PriceHistory {
    capacity: usize,
    series: RwLock<HashMap<(ExchangeId, Symbol), VecDeque<(DateTime<Utc>, f64)>>>,
}

impl PriceHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(2),
            series: RwLock::new(HashMap::new()),
        }
    }

    /// Append the quote's mid price.
    ///
    /// A quote whose timestamp is not newer than the last recorded point is
    /// ignored, so replaying the same cycle does not skew the series.
    pub fn record(&self, quote: &Quote) -> bool {
        let Some(mid) = quote.mid().to_f64() else {
            return false;
        };
        let key = (quote.exchange().clone(), quote.symbol().clone());
        let mut series = self.series.write();
        let points = series.entry(key).or_default();
        if points
            .back()
            .is_some_and(|(last, _)| *last >= quote.timestamp())
        {
            return false;
        }
        if points.len() == self.capacity {
            points.pop_front();
        }
        points.push_back((quote.timestamp(), mid));
        true
    }

    /// Sample standard deviation of percentage changes between consecutive
    /// mid prices, in percent. Zero with fewer than three points.
    pub fn volatility_pct(&self, exchange: &ExchangeId, symbol: &Symbol) -> f64 {
        let series = self.series.read();
        let Some(points) = series.get(&(exchange.clone(), symbol.clone())) else {
            return 0.0;
        };

        let changes: Vec<f64> = points
            .iter()
            .zip(points.iter().skip(1))
            .filter(|((_, prev), _)| *prev != 0.0)
            .map(|((_, prev), (_, next))| (next - prev) / prev)
            .collect();
        if changes.len() < 2 {
            return 0.0;
        }

        let n = changes.len() as f64;
        let mean = changes.iter().sum::<f64>() / n;
        let variance = changes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (n - 1.0);
        variance.sqrt() * 100.0
    }

    pub fn len(&self, exchange: &ExchangeId, symbol: &Symbol) -> usize {
        self.series
            .read()
            .get(&(exchange.clone(), symbol.clone()))
            .map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn quote(mid: Decimal, secs: i64) -> Quote {
        let at = DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap();
        Quote::builder(ExchangeId::new("a"), Symbol::parse("BTC/USD").unwrap())
            .bid(mid)
            .ask(mid)
            .timestamp(at)
            .build()
            .unwrap()
    }

    fn key() -> (ExchangeId, Symbol) {
        (ExchangeId::new("a"), Symbol::parse("BTC/USD").unwrap())
    }

    #[test]
    fn flat_prices_have_zero_volatility() {
        let history = PriceHistory::new(10);
        for i in 0..5 {
            history.record(&quote(dec!(100), i));
        }
        let (ex, sym) = key();
        assert_eq!(history.volatility_pct(&ex, &sym), 0.0);
    }

    #[test]
    fn alternating_prices_have_positive_volatility() {
        let history = PriceHistory::new(10);
        history.record(&quote(dec!(100), 0));
        history.record(&quote(dec!(110), 1));
        history.record(&quote(dec!(100), 2));
        let (ex, sym) = key();
        // changes: +10%, -9.0909%; sample std ~ 13.5
        let vol = history.volatility_pct(&ex, &sym);
        assert!(vol > 13.0 && vol < 14.0, "got {vol}");
    }

    #[test]
    fn replayed_quote_is_ignored() {
        let history = PriceHistory::new(10);
        assert!(history.record(&quote(dec!(100), 0)));
        assert!(!history.record(&quote(dec!(100), 0)));
        assert!(!history.record(&quote(dec!(90), -5)));
        let (ex, sym) = key();
        assert_eq!(history.len(&ex, &sym), 1);
    }

    #[test]
    fn capacity_bounds_series() {
        let history = PriceHistory::new(3);
        for i in 0..10 {
            history.record(&quote(Decimal::from(100 + i), i));
        }
        let (ex, sym) = key();
        assert_eq!(history.len(&ex, &sym), 3);
    }

    #[test]
    fn unknown_series_is_zero() {
        let history = PriceHistory::new(3);
        assert_eq!(
            history.volatility_pct(&ExchangeId::new("x"), &Symbol::parse("ETH/USD").unwrap()),
            0.0
        );
    }
}
