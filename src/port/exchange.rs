//! Exchange quote source port.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{ExchangeId, Quote, Symbol};
use crate::error::FetchError;

/// Outcome of one fetch: quotes for the symbols that succeeded and an
/// error for every symbol that did not.
///
/// A symbol appears in at most one of the two maps.
#[derive(Debug, Clone, Default)]
pub struct FetchBatch {
    pub quotes: BTreeMap<Symbol, Quote>,
    pub errors: BTreeMap<Symbol, FetchError>,
}

impl FetchBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A batch in which every requested symbol failed with the same error.
    pub fn failed<'a>(symbols: impl IntoIterator<Item = &'a Symbol>, error: &FetchError) -> Self {
        Self {
            quotes: BTreeMap::new(),
            errors: symbols
                .into_iter()
                .map(|s| (s.clone(), error.clone()))
                .collect(),
        }
    }

    pub fn insert_quote(&mut self, quote: Quote) {
        self.errors.remove(quote.symbol());
        self.quotes.insert(quote.symbol().clone(), quote);
    }

    pub fn insert_error(&mut self, symbol: Symbol, error: FetchError) {
        self.quotes.remove(&symbol);
        self.errors.insert(symbol, error);
    }

    /// Fold another batch into this one; entries in `other` win.
    pub fn merge(&mut self, other: FetchBatch) {
        for (_, quote) in other.quotes {
            self.insert_quote(quote);
        }
        for (symbol, error) in other.errors {
            self.insert_error(symbol, error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty() && self.errors.is_empty()
    }
}

/// Fetches current best bid/ask for a set of symbols from one exchange.
///
/// Implementations translate symbols to the exchange's native format,
/// bound every request with a timeout, respect the exchange's rate limit
/// and retry transient failures themselves. They never write to shared
/// state: the caller applies the returned batch to the quote cache.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Exchange this source reads from.
    fn exchange(&self) -> &ExchangeId;

    /// Native symbol for a canonical pair, or `None` if the exchange cannot
    /// represent it.
    fn native_symbol(&self, symbol: &Symbol) -> Option<String>;

    /// Fetch quotes for `symbols`. Never fails as a whole: failures are
    /// reported per symbol in [`FetchBatch::errors`].
    async fn fetch_quotes(&self, symbols: &[Symbol]) -> FetchBatch;
}
