//! Process-wide latest-quote store.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::{ExchangeId, Quote, Symbol};

/// Every exchange's latest quote for one symbol.
///
/// Never mutated in place: writers build a new map and swap the `Arc`, so
/// a reader holding a slot sees one committed state for the whole symbol.
type Slot = Arc<BTreeMap<ExchangeId, Arc<Quote>>>;

/// Latest quote per (exchange, symbol) with freshness tracking.
///
/// Slots are keyed by symbol, so a write touches one `DashMap` shard and
/// reads never lock the whole cache. [`apply`](Self::apply) replaces all
/// of a symbol's quotes from one cycle in a single swap.
pub struct QuoteCache {
    slots: DashMap<Symbol, Slot>,
    freshness_window: chrono::Duration,
}

/// A cached quote together with its staleness at snapshot time.
#[derive(Debug, Clone)]
pub struct QuoteCacheEntry {
    quote: Arc<Quote>,
    stale: bool,
}

impl QuoteCacheEntry {
    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

impl QuoteCache {
    /// Create a cache that flags quotes older than `freshness_window` as stale.
    pub fn new(freshness_window: Duration) -> Self {
        Self {
            slots: DashMap::new(),
            freshness_window: chrono::Duration::from_std(freshness_window)
                .unwrap_or_else(|_| chrono::Duration::MAX),
        }
    }

    pub fn freshness_window(&self) -> chrono::Duration {
        self.freshness_window
    }

    /// Replace the quote for the quote's own (exchange, symbol) key.
    pub fn update(&self, quote: Quote) {
        self.apply([quote]);
    }

    /// Store a batch of quotes. All quotes for the same symbol land in one
    /// slot replacement, so readers see either none or all of them.
    pub fn apply(&self, quotes: impl IntoIterator<Item = Quote>) {
        let mut by_symbol: BTreeMap<Symbol, Vec<Quote>> = BTreeMap::new();
        for quote in quotes {
            by_symbol
                .entry(quote.symbol().clone())
                .or_default()
                .push(quote);
        }

        for (symbol, quotes) in by_symbol {
            let mut slot = self.slots.entry(symbol).or_default();
            let mut next = BTreeMap::clone(&slot);
            for quote in quotes {
                next.insert(quote.exchange().clone(), Arc::new(quote));
            }
            *slot = Arc::new(next);
        }
    }

    /// Latest quote for `(exchange, symbol)`, stale or not.
    pub fn get(&self, exchange: &ExchangeId, symbol: &Symbol) -> Option<Arc<Quote>> {
        let slot = self.slot(symbol)?;
        slot.get(exchange).cloned()
    }

    /// Latest quote with its staleness relative to `now`.
    pub fn entry(
        &self,
        exchange: &ExchangeId,
        symbol: &Symbol,
        now: DateTime<Utc>,
    ) -> Option<QuoteCacheEntry> {
        self.get(exchange, symbol).map(|quote| self.to_entry(quote, now))
    }

    /// Point-in-time view of `symbols`.
    ///
    /// Each symbol's quotes come from a single committed slot; symbols with
    /// nothing cached are absent.
    pub fn snapshot_all(&self, symbols: &[Symbol], now: DateTime<Utc>) -> QuoteSnapshot {
        let mut entries = BTreeMap::new();
        for symbol in symbols {
            let Some(slot) = self.slot(symbol) else {
                continue;
            };
            let per_exchange: BTreeMap<ExchangeId, QuoteCacheEntry> = slot
                .iter()
                .map(|(exchange, quote)| (exchange.clone(), self.to_entry(Arc::clone(quote), now)))
                .collect();
            entries.insert(symbol.clone(), per_exchange);
        }
        QuoteSnapshot {
            taken_at: now,
            entries,
        }
    }

    /// Number of cached (exchange, symbol) quotes.
    pub fn len(&self) -> usize {
        self.slots.iter().map(|slot| slot.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, symbol: &Symbol) -> Option<Slot> {
        self.slots.get(symbol).map(|slot| Arc::clone(slot.value()))
    }

    fn to_entry(&self, quote: Arc<Quote>, now: DateTime<Utc>) -> QuoteCacheEntry {
        let stale = !quote.is_fresh(now, self.freshness_window);
        QuoteCacheEntry { quote, stale }
    }
}

/// Quotes read from the cache at one instant.
#[derive(Debug, Clone)]
pub struct QuoteSnapshot {
    taken_at: DateTime<Utc>,
    entries: BTreeMap<Symbol, BTreeMap<ExchangeId, QuoteCacheEntry>>,
}

impl QuoteSnapshot {
    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn entry(&self, exchange: &ExchangeId, symbol: &Symbol) -> Option<&QuoteCacheEntry> {
        self.entries.get(symbol)?.get(exchange)
    }

    /// The quote for `(exchange, symbol)` if present and not stale.
    pub fn fresh(&self, exchange: &ExchangeId, symbol: &Symbol) -> Option<&Quote> {
        self.entry(exchange, symbol)
            .filter(|e| !e.is_stale())
            .map(QuoteCacheEntry::quote)
    }

    /// Every `(exchange, symbol) -> entry` pair in the snapshot.
    pub fn iter(&self) -> impl Iterator<Item = ((&ExchangeId, &Symbol), &QuoteCacheEntry)> {
        self.entries.iter().flat_map(|(symbol, per_exchange)| {
            per_exchange
                .iter()
                .map(move |(exchange, entry)| ((exchange, symbol), entry))
        })
    }

    /// Count of fresh quotes held for `exchange`.
    pub fn fresh_count(&self, exchange: &ExchangeId) -> usize {
        self.entries
            .values()
            .filter_map(|per_exchange| per_exchange.get(exchange))
            .filter(|e| !e.is_stale())
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
