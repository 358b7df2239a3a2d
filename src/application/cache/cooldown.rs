//! Fatal-error cool-downs per (exchange, symbol).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::domain::{ExchangeId, Symbol};

/// Tracks (exchange, symbol) pairs that are skipped until a deadline.
///
/// A symbol an exchange reports as unknown, or an exchange rejecting our
/// credentials, would fail again on every cycle; the detector parks those
/// pairs here instead of hammering the API.
#[derive(Debug, Default)]
pub struct Cooldowns {
    until: Mutex<HashMap<(ExchangeId, Symbol), Instant>>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable `(exchange, symbol)` for `period` starting at `now`.
    pub fn disable(&self, exchange: &ExchangeId, symbol: &Symbol, period: Duration, now: Instant) {
        self.until
            .lock()
            .insert((exchange.clone(), symbol.clone()), now + period);
    }

    pub fn is_disabled(&self, exchange: &ExchangeId, symbol: &Symbol, now: Instant) -> bool {
        self.until
            .lock()
            .get(&(exchange.clone(), symbol.clone()))
            .is_some_and(|deadline| *deadline > now)
    }

    /// The subset of `symbols` that `exchange` should be asked for.
    pub fn active(&self, exchange: &ExchangeId, symbols: &[Symbol], now: Instant) -> Vec<Symbol> {
        let until = self.until.lock();
        symbols
            .iter()
            .filter(|symbol| {
                until
                    .get(&(exchange.clone(), (*symbol).clone()))
                    .map_or(true, |deadline| *deadline <= now)
            })
            .cloned()
            .collect()
    }

    /// Drop expired entries. Returns how many were removed.
    pub fn prune(&self, now: Instant) -> usize {
        let mut until = self.until.lock();
        let before = until.len();
        until.retain(|_, deadline| *deadline > now);
        before - until.len()
    }

    pub fn len(&self) -> usize {
        self.until.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
