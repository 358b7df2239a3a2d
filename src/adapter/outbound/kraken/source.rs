//! Kraken quote source.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::dto::{Envelope, TickerInfo, TickerResult};
use crate::adapter::outbound::rest::RestTransport;
use crate::adapter::outbound::symbols::SymbolMap;
use crate::domain::{ExchangeId, Quote, Symbol};
use crate::error::{FetchError, Result};
use crate::infrastructure::config::exchange::ExchangeConfig;
use crate::port::{FetchBatch, QuoteSource};

const TICKER_PATH: &str = "/0/public/Ticker";

/// A symbol to request, with the names Kraken may answer under.
#[derive(Debug, Clone)]
pub(crate) struct PairRequest {
    pub symbol: Symbol,
    pub native: String,
    /// Legacy `X{base}Z{quote}` key Kraken uses for its oldest pairs.
    pub legacy: String,
}

/// Quote source backed by Kraken's public ticker endpoint.
pub struct KrakenSource {
    exchange: ExchangeId,
    transport: RestTransport,
    symbols: SymbolMap,
}

impl KrakenSource {
    /// Create a source from configuration.
    ///
    /// # Errors
    ///
    /// Fails on an invalid API URL or request rate.
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let symbols = SymbolMap::kraken()
            .with_overrides(config.symbol_overrides.clone())
            .with_unsupported(config.unsupported_symbols.iter().cloned());
        Ok(Self {
            exchange: config.exchange_id(),
            transport: RestTransport::new(config, |status, body| {
                FetchError::from_status(status, body)
            })?,
            symbols,
        })
    }

    fn request_for(&self, symbol: &Symbol) -> Option<PairRequest> {
        let native = self.symbols.native(symbol)?;
        let (base, quote) = self.symbols.native_assets(symbol);
        Some(PairRequest {
            symbol: symbol.clone(),
            native,
            legacy: format!("X{base}Z{quote}"),
        })
    }

    async fn fetch_tickers(
        &self,
        requests: &[PairRequest],
    ) -> std::result::Result<TickerResult, FetchError> {
        let pairs = requests
            .iter()
            .map(|r| r.native.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let envelope: Envelope<TickerResult> = self
            .transport
            .get_json(TICKER_PATH, &[("pair", pairs)])
            .await?;
        if !envelope.error.is_empty() {
            return Err(classify_errors(&envelope.error));
        }
        envelope
            .result
            .ok_or_else(|| FetchError::Malformed("missing result".into()))
    }
}

#[async_trait]
impl QuoteSource for KrakenSource {
    fn exchange(&self) -> &ExchangeId {
        &self.exchange
    }

    fn native_symbol(&self, symbol: &Symbol) -> Option<String> {
        self.symbols.native(symbol)
    }

    async fn fetch_quotes(&self, symbols: &[Symbol]) -> FetchBatch {
        let mut batch = FetchBatch::new();
        let mut requests = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match self.request_for(symbol) {
                Some(request) => requests.push(request),
                None => batch.insert_error(
                    symbol.clone(),
                    FetchError::UnsupportedSymbol(symbol.to_string()),
                ),
            }
        }
        if requests.is_empty() {
            return batch;
        }

        match self.fetch_tickers(&requests).await {
            Ok(result) => batch.merge(quotes_from_result(&self.exchange, &requests, result)),
            Err(FetchError::UnsupportedSymbol(reason)) if requests.len() > 1 => {
                debug!(exchange = %self.exchange, %reason, "Batch rejected, fetching pairs individually");
                for request in &requests {
                    let single = std::slice::from_ref(request);
                    match self.fetch_tickers(single).await {
                        Ok(result) => batch.merge(quotes_from_result(&self.exchange, single, result)),
                        Err(err) => batch.insert_error(request.symbol.clone(), err),
                    }
                }
            }
            Err(err) => {
                warn!(exchange = %self.exchange, error = %err, "Ticker request failed");
                batch.merge(FetchBatch::failed(requests.iter().map(|r| &r.symbol), &err));
            }
        }
        batch
    }
}

/// Map Kraken's result keys back to the requested symbols.
pub(crate) fn quotes_from_result(
    exchange: &ExchangeId,
    requests: &[PairRequest],
    mut result: TickerResult,
) -> FetchBatch {
    let mut batch = FetchBatch::new();
    let only_one = requests.len() == 1 && result.len() == 1;

    for request in requests {
        let info = result
            .remove(&request.native)
            .or_else(|| result.remove(&request.legacy))
            .or_else(|| {
                let key = only_one.then(|| result.keys().next().cloned()).flatten()?;
                result.remove(&key)
            });
        let Some(info) = info else {
            batch.insert_error(
                request.symbol.clone(),
                FetchError::Malformed(format!("{} missing from response", request.native)),
            );
            continue;
        };
        match to_quote(exchange, &request.symbol, &info) {
            Ok(quote) => batch.insert_quote(quote),
            Err(err) => batch.insert_error(request.symbol.clone(), err),
        }
    }
    batch
}

fn to_quote(
    exchange: &ExchangeId,
    symbol: &Symbol,
    info: &TickerInfo,
) -> std::result::Result<Quote, FetchError> {
    let (Some(&ask), Some(&bid)) = (info.a.first(), info.b.first()) else {
        return Err(FetchError::Malformed("empty bid/ask".into()));
    };
    let mut builder = Quote::builder(exchange.clone(), symbol.clone())
        .bid(bid)
        .ask(ask);
    if let Some(&size) = info.b.get(2) {
        builder = builder.bid_size(size);
    }
    if let Some(&size) = info.a.get(2) {
        builder = builder.ask_size(size);
    }
    // Kraken reports base volume; normalize to quote currency at the mid.
    if let Some(&base_volume) = info.v.get(1) {
        let mid = bid + (ask - bid) / Decimal::TWO;
        if let Some(volume) = base_volume.checked_mul(mid) {
            builder = builder.volume_24h(volume.round_dp(2));
        }
    }
    Ok(builder.build()?)
}

fn classify_errors(errors: &[String]) -> FetchError {
    let joined = errors.join("; ");
    let has = |needle: &str| errors.iter().any(|e| e.contains(needle));
    if has("Unknown asset pair") {
        FetchError::UnsupportedSymbol(joined)
    } else if has("Rate limit") || has("Too many requests") {
        FetchError::RateLimited
    } else if has("EService:Unavailable") || has("EService:Busy") {
        FetchError::Server { status: 503 }
    } else if has("Invalid key") || has("Permission denied") {
        FetchError::Unauthorized(joined)
    } else {
        FetchError::Rejected {
            status: 200,
            message: joined,
        }
    }
}
