//! Binance quote source.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tracing::{debug, warn};

use super::dto::{ApiError, Ticker24h};
use crate::adapter::outbound::rest::RestTransport;
use crate::adapter::outbound::symbols::SymbolMap;
use crate::domain::{ExchangeId, Quote, Symbol};
use crate::error::{FetchError, Result};
use crate::infrastructure::config::exchange::ExchangeConfig;
use crate::port::{FetchBatch, QuoteSource};

const TICKER_PATH: &str = "/api/v3/ticker/24hr";

/// Quote source backed by Binance's 24h ticker endpoint, which carries
/// best bid/ask with sizes and quote-currency volume in one call.
pub struct BinanceSource {
    exchange: ExchangeId,
    transport: RestTransport,
    symbols: SymbolMap,
}

impl BinanceSource {
    /// Create a source from configuration.
    ///
    /// # Errors
    ///
    /// Fails on an invalid API URL or request rate.
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let symbols = SymbolMap::binance()
            .with_overrides(config.symbol_overrides.clone())
            .with_unsupported(config.unsupported_symbols.iter().cloned());
        Ok(Self {
            exchange: config.exchange_id(),
            transport: RestTransport::new(config, classify_error)?,
            symbols,
        })
    }

    async fn fetch_tickers(
        &self,
        natives: &[&str],
    ) -> std::result::Result<Vec<Ticker24h>, FetchError> {
        let names = serde_json::to_string(natives).map_err(|e| FetchError::Malformed(e.to_string()))?;
        self.transport
            .get_json(TICKER_PATH, &[("symbols", names)])
            .await
    }
}

#[async_trait]
impl QuoteSource for BinanceSource {
    fn exchange(&self) -> &ExchangeId {
        &self.exchange
    }

    fn native_symbol(&self, symbol: &Symbol) -> Option<String> {
        self.symbols.native(symbol)
    }

    async fn fetch_quotes(&self, symbols: &[Symbol]) -> FetchBatch {
        let mut batch = FetchBatch::new();
        let mut requested: Vec<(Symbol, String)> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match self.symbols.native(symbol) {
                Some(native) => requested.push((symbol.clone(), native)),
                None => batch.insert_error(
                    symbol.clone(),
                    FetchError::UnsupportedSymbol(symbol.to_string()),
                ),
            }
        }
        if requested.is_empty() {
            return batch;
        }

        let natives: Vec<&str> = requested.iter().map(|(_, n)| n.as_str()).collect();
        match self.fetch_tickers(&natives).await {
            Ok(tickers) => batch.merge(quotes_from_tickers(&self.exchange, &requested, tickers)),
            // One unknown symbol fails the whole request; isolate it.
            Err(FetchError::UnsupportedSymbol(reason)) if requested.len() > 1 => {
                debug!(exchange = %self.exchange, %reason, "Batch rejected, fetching symbols individually");
                for pair in &requested {
                    let single = std::slice::from_ref(pair);
                    match self.fetch_tickers(&[pair.1.as_str()]).await {
                        Ok(tickers) => {
                            batch.merge(quotes_from_tickers(&self.exchange, single, tickers));
                        }
                        Err(err) => batch.insert_error(pair.0.clone(), err),
                    }
                }
            }
            Err(err) => {
                warn!(exchange = %self.exchange, error = %err, "Ticker request failed");
                batch.merge(FetchBatch::failed(requested.iter().map(|(s, _)| s), &err));
            }
        }
        batch
    }
}

/// Convert ticker payloads into quotes for the requested symbols.
///
/// Requested symbols missing from the payload are reported as malformed
/// responses; tickers that fail quote validation are reported as invalid.
pub(crate) fn quotes_from_tickers(
    exchange: &ExchangeId,
    requested: &[(Symbol, String)],
    tickers: Vec<Ticker24h>,
) -> FetchBatch {
    let mut by_native: HashMap<String, Ticker24h> =
        tickers.into_iter().map(|t| (t.symbol.clone(), t)).collect();
    let mut batch = FetchBatch::new();

    for (symbol, native) in requested {
        let Some(ticker) = by_native.remove(native) else {
            batch.insert_error(
                symbol.clone(),
                FetchError::Malformed(format!("{native} missing from response")),
            );
            continue;
        };
        match to_quote(exchange, symbol, &ticker) {
            Ok(quote) => batch.insert_quote(quote),
            Err(err) => batch.insert_error(symbol.clone(), err),
        }
    }
    batch
}

fn to_quote(
    exchange: &ExchangeId,
    symbol: &Symbol,
    ticker: &Ticker24h,
) -> std::result::Result<Quote, FetchError> {
    let mut builder = Quote::builder(exchange.clone(), symbol.clone())
        .bid(ticker.bid_price)
        .ask(ticker.ask_price);
    if let Some(qty) = ticker.bid_qty {
        builder = builder.bid_size(qty);
    }
    if let Some(qty) = ticker.ask_qty {
        builder = builder.ask_size(qty);
    }
    if let Some(volume) = ticker.quote_volume {
        builder = builder.volume_24h(volume);
    }
    if let Some(ts) = ticker
        .close_time
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    {
        builder = builder.timestamp(ts);
    }
    Ok(builder.build()?)
}

fn classify_error(status: u16, body: &str) -> FetchError {
    if let Ok(err) = serde_json::from_str::<ApiError>(body) {
        match err.code {
            -1121 => return FetchError::UnsupportedSymbol(err.msg),
            -2014 | -2015 => return FetchError::Unauthorized(err.msg),
            -1003 => return FetchError::RateLimited,
            _ => {}
        }
    }
    FetchError::from_status(status, body)
}
