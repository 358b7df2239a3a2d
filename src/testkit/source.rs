//! Scripted [`QuoteSource`] for detector tests.
//!
//! Replies are set per symbol and persist across fetches until changed, so a
//! test can run several cycles and mutate the market between them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{ExchangeId, Quote, Symbol};
use crate::error::FetchError;
use crate::port::{FetchBatch, QuoteSource};

#[derive(Debug, Clone)]
enum Reply {
    Price {
        bid: Decimal,
        ask: Decimal,
        size: Option<Decimal>,
        volume: Option<Decimal>,
    },
    Error(FetchError),
}

/// A quote source whose answers are set by the test.
///
/// Symbols without a reply come back as a transient network error. Quotes
/// are stamped at fetch time, shifted back by the configured age.
pub struct ScriptedSource {
    exchange: ExchangeId,
    replies: Mutex<HashMap<Symbol, Reply>>,
    delay: Mutex<Option<Duration>>,
    age: Mutex<chrono::Duration>,
    calls: Arc<AtomicU32>,
    requests: Mutex<Vec<Vec<Symbol>>>,
}

impl ScriptedSource {
    pub fn new(exchange: &str) -> Self {
        Self {
            exchange: ExchangeId::new(exchange),
            replies: Mutex::new(HashMap::new()),
            delay: Mutex::new(None),
            age: Mutex::new(chrono::Duration::zero()),
            calls: Arc::new(AtomicU32::new(0)),
            requests: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_price(self, symbol: &str, bid: Decimal, ask: Decimal) -> Self {
        self.set_price(symbol, bid, ask);
        self
    }

    #[must_use]
    pub fn with_error(self, symbol: &str, error: FetchError) -> Self {
        self.set_error(symbol, error);
        self
    }

    pub fn set_price(&self, symbol: &str, bid: Decimal, ask: Decimal) {
        self.replies.lock().insert(
            super::domain::symbol(symbol),
            Reply::Price {
                bid,
                ask,
                size: None,
                volume: None,
            },
        );
    }

    /// Price with top-of-book size on both sides and a 24h quote volume.
    pub fn set_book(&self, symbol: &str, bid: Decimal, ask: Decimal, size: Decimal, volume: Decimal) {
        self.replies.lock().insert(
            super::domain::symbol(symbol),
            Reply::Price {
                bid,
                ask,
                size: Some(size),
                volume: Some(volume),
            },
        );
    }

    pub fn set_error(&self, symbol: &str, error: FetchError) {
        self.replies
            .lock()
            .insert(super::domain::symbol(symbol), Reply::Error(error));
    }

    /// Make every currently scripted symbol fail with `error`.
    pub fn fail_all(&self, error: FetchError) {
        for reply in self.replies.lock().values_mut() {
            *reply = Reply::Error(error.clone());
        }
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock() = delay;
    }

    /// Backdate every quote returned from now on.
    pub fn set_quote_age(&self, age: Duration) {
        *self.age.lock() = chrono::Duration::from_std(age).unwrap_or_else(|_| chrono::Duration::zero());
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Symbols requested on each call, in call order.
    pub fn requests(&self) -> Vec<Vec<Symbol>> {
        self.requests.lock().clone()
    }

    fn quote(&self, symbol: &Symbol, reply: &Reply) -> Result<Quote, FetchError> {
        match reply {
            Reply::Error(e) => Err(e.clone()),
            Reply::Price {
                bid,
                ask,
                size,
                volume,
            } => {
                let mut builder = Quote::builder(self.exchange.clone(), symbol.clone())
                    .bid(*bid)
                    .ask(*ask)
                    .timestamp(Utc::now() - *self.age.lock());
                if let Some(size) = size {
                    builder = builder.bid_size(*size).ask_size(*size);
                }
                if let Some(volume) = volume {
                    builder = builder.volume_24h(*volume);
                }
                Ok(builder.build()?)
            }
        }
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    fn exchange(&self) -> &ExchangeId {
        &self.exchange
    }

    fn native_symbol(&self, symbol: &Symbol) -> Option<String> {
        Some(format!("{}{}", symbol.base(), symbol.quote()))
    }

    async fn fetch_quotes(&self, symbols: &[Symbol]) -> FetchBatch {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(symbols.to_vec());

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let replies = self.replies.lock().clone();
        let mut batch = FetchBatch::new();
        for symbol in symbols {
            let result = match replies.get(symbol) {
                Some(reply) => self.quote(symbol, reply),
                None => Err(FetchError::Network("no scripted reply".to_string())),
            };
            match result {
                Ok(quote) => batch.insert_quote(quote),
                Err(e) => batch.insert_error(symbol.clone(), e),
            }
        }
        batch
    }
}
