//! Quote source factory.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::{BinanceSource, KrakenSource};
use crate::domain::FeeSchedule;
use crate::error::Result;
use crate::infrastructure::config::exchange::{ExchangeConfig, ExchangeKind};
use crate::infrastructure::config::settings::Config;
use crate::port::QuoteSource;

/// Build the adapter for one `[[exchange]]` table.
///
/// # Errors
///
/// Fails if the adapter's HTTP transport cannot be set up.
pub fn build_source(config: &ExchangeConfig) -> Result<Arc<dyn QuoteSource>> {
    let source: Arc<dyn QuoteSource> = match config.kind {
        ExchangeKind::Binance => Arc::new(BinanceSource::new(config)?),
        ExchangeKind::Kraken => Arc::new(KrakenSource::new(config)?),
    };
    info!(
        exchange = %config.exchange_id(),
        kind = %config.kind,
        api_url = config.api_url(),
        requests_per_second = config.requests_per_second(),
        "Quote source ready"
    );
    Ok(source)
}

/// Build every configured adapter, in config order.
///
/// # Errors
///
/// Fails on the first adapter that cannot be built.
pub fn build_sources(config: &Config) -> Result<Vec<Arc<dyn QuoteSource>>> {
    config.exchanges.iter().map(build_source).collect()
}

/// Taker fee per configured exchange.
///
/// # Errors
///
/// Fails if a fee is outside `[0, 1)`.
pub fn build_fee_schedule(config: &Config) -> Result<FeeSchedule> {
    let mut fees = FeeSchedule::new();
    for exchange in &config.exchanges {
        fees = fees.with_rate(exchange.exchange_id(), exchange.taker_fee())?;
    }
    Ok(fees)
}
