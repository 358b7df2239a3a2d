//! The detection cycle.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::future::join_all;
use parking_lot::RwLock;
use rust_decimal::prelude::ToPrimitive;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::config::DetectorConfig;
use super::enrich::Enricher;
use super::phase::CyclePhase;
use super::ranking::{aggregate, filter_liquidity, rank};
use crate::application::cache::{Cooldowns, PriceHistory, QuoteCache, QuoteSnapshot};
use crate::application::feed::{self, FeedPublisher, OpportunityFeed};
use crate::application::report::{CycleReport, ExchangeHealth, ExchangeStatus, Skipped};
use crate::domain::{
    ExchangeId, FeeSchedule, OpportunityCandidate, ScoredOpportunity, SpreadCalculator, Symbol,
};
use crate::error::{ConfigError, FetchError, Result};
use crate::port::{Explainer, FetchBatch, MarketFeatures, QuoteSource, Scorer};

const DEFAULT_FATAL_COOLDOWN: Duration = Duration::from_secs(300);

/// Ranked, scored opportunities for one snapshot plus the symbols skipped.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub opportunities: Vec<ScoredOpportunity>,
    pub skipped: Vec<Skipped>,
    pub priced_symbols: usize,
}

/// One source's contribution to the fetching phase.
struct SourceFetch {
    exchange: ExchangeId,
    batch: FetchBatch,
    cooling_down: usize,
    timed_out: bool,
}

/// Drives `Idle -> Fetching -> Aggregating -> Filtering -> Ranked` over two
/// quote sources.
///
/// Cycles are strictly sequential: [`run_cycle`](Self::run_cycle) holds an
/// async lock for its whole duration, so a second caller waits until the
/// first cycle has published.
pub struct Detector {
    sources: [Arc<dyn QuoteSource>; 2],
    symbols: Vec<Symbol>,
    calculator: SpreadCalculator,
    config: DetectorConfig,
    cache: Arc<QuoteCache>,
    history: PriceHistory,
    cooldowns: Cooldowns,
    fatal_cooldowns: HashMap<ExchangeId, Duration>,
    enricher: Enricher,
    publisher: FeedPublisher,
    cycle: Mutex<u64>,
    phase: RwLock<CyclePhase>,
}

impl Detector {
    pub fn builder() -> DetectorBuilder {
        DetectorBuilder::default()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn exchanges(&self) -> [&ExchangeId; 2] {
        [self.sources[0].exchange(), self.sources[1].exchange()]
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<QuoteCache> {
        &self.cache
    }

    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    pub fn phase(&self) -> CyclePhase {
        *self.phase.read()
    }

    /// A new read handle on published cycle reports.
    pub fn feed(&self) -> OpportunityFeed {
        self.publisher.subscribe()
    }

    /// Run one full cycle and publish its report.
    ///
    /// Never fails: adapter errors are absorbed into the report's health
    /// entries, and a cycle without usable data yields an empty list.
    pub async fn run_cycle(&self) -> Arc<CycleReport> {
        let mut counter = self.cycle.lock().await;
        *counter += 1;
        let cycle = *counter;
        let started_at = Utc::now();

        self.enter(CyclePhase::Fetching, cycle);
        let fetches = self.fetch_all().await;
        self.apply(&fetches);

        self.enter(CyclePhase::Aggregating, cycle);
        let snapshot = self.cache.snapshot_all(&self.symbols, Utc::now());
        let detection = self.evaluate(&snapshot, Some(cycle)).await;
        let health = self.health(&fetches, &snapshot);

        let report = Arc::new(CycleReport {
            cycle,
            started_at,
            completed_at: Utc::now(),
            opportunities: detection.opportunities,
            health,
            skipped: detection.skipped,
            priced_symbols: detection.priced_symbols,
        });

        info!(
            cycle,
            outcome = ?report.outcome(),
            opportunities = report.opportunities.len(),
            priced = report.priced_symbols,
            skipped = report.skipped.len(),
            duration_ms = report.duration().num_milliseconds(),
            "Detection cycle complete"
        );
        for health in &report.health {
            if health.status != ExchangeStatus::Available {
                warn!(
                    cycle,
                    exchange = %health.exchange,
                    status = health.status.as_str(),
                    fresh = health.fresh_quotes,
                    failed = health.failed_symbols,
                    "Exchange not fully available"
                );
            }
        }

        self.publisher.publish(Arc::clone(&report));
        self.enter(CyclePhase::Idle, cycle);
        report
    }

    /// Aggregate, filter, rank and enrich the quotes in `snapshot`.
    ///
    /// Reads nothing but the snapshot and in-process price history, so two
    /// calls over the same cached quotes return the same ranking.
    pub async fn detect(&self, snapshot: &QuoteSnapshot) -> Detection {
        self.evaluate(snapshot, None).await
    }

    async fn evaluate(&self, snapshot: &QuoteSnapshot, cycle: Option<u64>) -> Detection {
        let aggregation = aggregate(&self.calculator, snapshot, &self.symbols, self.exchanges());
        if let Some(cycle) = cycle {
            debug!(
                cycle,
                candidates = aggregation.candidates.len(),
                priced = aggregation.priced_symbols,
                "Spreads aggregated"
            );
            self.enter(CyclePhase::Filtering, cycle);
        }
        let (mut candidates, illiquid) =
            filter_liquidity(aggregation.candidates, self.config.min_liquidity_notional);

        if let Some(cycle) = cycle {
            self.enter(CyclePhase::Ranked, cycle);
        }
        rank(&mut candidates);
        let with_features = candidates
            .into_iter()
            .map(|candidate| {
                let features = self.features(&candidate, snapshot);
                (candidate, features)
            })
            .collect();
        let opportunities = self.enricher.enrich_all(with_features).await;

        let mut skipped = aggregation.skipped;
        skipped.extend(illiquid);
        Detection {
            opportunities,
            skipped,
            priced_symbols: aggregation.priced_symbols,
        }
    }

    fn enter(&self, phase: CyclePhase, cycle: u64) {
        *self.phase.write() = phase;
        debug!(cycle, phase = phase.as_str(), "Cycle phase");
    }

    /// Fetch every active symbol from both sources concurrently, each bounded
    /// by the cycle deadline.
    async fn fetch_all(&self) -> Vec<SourceFetch> {
        let now = Instant::now();
        self.cooldowns.prune(now);
        let deadline = self.config.cycle_deadline();

        let fetches = self.sources.iter().map(|source| {
            let exchange = source.exchange().clone();
            let active = self.cooldowns.active(&exchange, &self.symbols, now);
            let cooling_down = self.symbols.len() - active.len();
            async move {
                if active.is_empty() {
                    return SourceFetch {
                        exchange,
                        batch: FetchBatch::new(),
                        cooling_down,
                        timed_out: false,
                    };
                }
                match timeout(deadline, source.fetch_quotes(&active)).await {
                    Ok(batch) => SourceFetch {
                        exchange,
                        batch,
                        cooling_down,
                        timed_out: false,
                    },
                    Err(_) => {
                        warn!(
                            exchange = %exchange,
                            deadline_ms = deadline.as_millis() as u64,
                            "Fetch missed cycle deadline, using cached quotes"
                        );
                        SourceFetch {
                            exchange,
                            batch: FetchBatch::failed(&active, &FetchError::Timeout(deadline)),
                            cooling_down,
                            timed_out: true,
                        }
                    }
                }
            }
        });

        join_all(fetches).await
    }

    /// Write fetched quotes into the cache and history; park fatal symbols.
    fn apply(&self, fetches: &[SourceFetch]) {
        let now = Instant::now();
        let mut quotes = Vec::new();

        for fetch in fetches {
            for quote in fetch.batch.quotes.values() {
                if quote.exchange() != &fetch.exchange {
                    warn!(
                        exchange = %fetch.exchange,
                        quote_exchange = %quote.exchange(),
                        symbol = %quote.symbol(),
                        "Dropping quote attributed to another exchange"
                    );
                    continue;
                }
                self.history.record(quote);
                quotes.push(quote.clone());
            }

            for (symbol, error) in &fetch.batch.errors {
                if error.is_fatal() {
                    let period = self
                        .fatal_cooldowns
                        .get(&fetch.exchange)
                        .copied()
                        .unwrap_or(DEFAULT_FATAL_COOLDOWN);
                    self.cooldowns.disable(&fetch.exchange, symbol, period, now);
                    warn!(
                        exchange = %fetch.exchange,
                        symbol = %symbol,
                        error = %error,
                        cooldown_secs = period.as_secs(),
                        "Fatal fetch error, symbol disabled"
                    );
                } else if !fetch.timed_out {
                    warn!(
                        exchange = %fetch.exchange,
                        symbol = %symbol,
                        error = %error,
                        "Transient fetch error"
                    );
                }
            }
        }

        self.cache.apply(quotes);
    }

    fn features(&self, candidate: &OpportunityCandidate, snapshot: &QuoteSnapshot) -> MarketFeatures {
        let symbol = candidate.symbol();
        let [a, b] = self.exchanges();
        let volume = |exchange: &ExchangeId| {
            snapshot
                .entry(exchange, symbol)
                .and_then(|e| e.quote().volume_24h())
        };
        let volume_diff = match (volume(a), volume(b)) {
            (Some(va), Some(vb)) => (va - vb).abs().to_f64().unwrap_or(0.0),
            _ => 0.0,
        };
        let volatility_pct = self
            .history
            .volatility_pct(a, symbol)
            .max(self.history.volatility_pct(b, symbol));

        MarketFeatures {
            volume_diff,
            volatility_pct,
        }
    }

    fn health(&self, fetches: &[SourceFetch], snapshot: &QuoteSnapshot) -> Vec<ExchangeHealth> {
        fetches
            .iter()
            .map(|fetch| {
                let fresh_quotes = snapshot.fresh_count(&fetch.exchange);
                let failed_symbols = fetch.batch.errors.len();
                let status = if fresh_quotes == 0 {
                    ExchangeStatus::Unavailable
                } else if failed_symbols > 0
                    || fetch.timed_out
                    || fresh_quotes < self.symbols.len()
                {
                    ExchangeStatus::Degraded
                } else {
                    ExchangeStatus::Available
                };
                ExchangeHealth {
                    exchange: fetch.exchange.clone(),
                    status,
                    fresh_quotes,
                    failed_symbols,
                    cooling_down: fetch.cooling_down,
                    timed_out: fetch.timed_out,
                    last_error: fetch.batch.errors.values().next().map(ToString::to_string),
                }
            })
            .collect()
    }
}

/// Builder for [`Detector`].
#[derive(Default)]
pub struct DetectorBuilder {
    sources: Vec<Arc<dyn QuoteSource>>,
    symbols: Vec<Symbol>,
    fees: FeeSchedule,
    config: DetectorConfig,
    cache: Option<Arc<QuoteCache>>,
    scorer: Option<Arc<dyn Scorer>>,
    explainer: Option<Arc<dyn Explainer>>,
    fatal_cooldowns: HashMap<ExchangeId, Duration>,
}

impl DetectorBuilder {
    #[must_use]
    pub fn source(mut self, source: Arc<dyn QuoteSource>) -> Self {
        self.sources.push(source);
        self
    }

    #[must_use]
    pub fn symbols(mut self, symbols: impl IntoIterator<Item = Symbol>) -> Self {
        self.symbols = symbols.into_iter().collect();
        self
    }

    #[must_use]
    pub fn fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    #[must_use]
    pub fn config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing cache instead of creating one.
    #[must_use]
    pub fn cache(mut self, cache: Arc<QuoteCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    #[must_use]
    pub fn explainer(mut self, explainer: Arc<dyn Explainer>) -> Self {
        self.explainer = Some(explainer);
        self
    }

    /// How long `exchange` skips a symbol after a fatal fetch error.
    #[must_use]
    pub fn fatal_cooldown(mut self, exchange: ExchangeId, period: Duration) -> Self {
        self.fatal_cooldowns.insert(exchange, period);
        self
    }

    /// # Errors
    ///
    /// Returns a configuration error unless there are exactly two sources
    /// for distinct exchanges, at least one symbol, a scorer and a valid
    /// [`DetectorConfig`].
    pub fn build(self) -> Result<Detector> {
        self.config.validate()?;

        let sources: [Arc<dyn QuoteSource>; 2] = self.sources.try_into().map_err(
            |sources: Vec<Arc<dyn QuoteSource>>| ConfigError::InvalidValue {
                field: "exchange",
                reason: format!("exactly two exchanges required, got {}", sources.len()),
            },
        )?;
        if sources[0].exchange() == sources[1].exchange() {
            return Err(ConfigError::InvalidValue {
                field: "exchange",
                reason: format!("duplicate exchange id '{}'", sources[0].exchange()),
            }
            .into());
        }

        let mut symbols = self.symbols;
        symbols.sort();
        symbols.dedup();
        if symbols.is_empty() {
            return Err(ConfigError::MissingField { field: "symbols" }.into());
        }

        let scorer = self
            .scorer
            .ok_or(ConfigError::MissingField { field: "scorer" })?;

        let (publisher, _feed) = feed::channel();
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(QuoteCache::new(self.config.freshness_window())));
        let calculator = SpreadCalculator::new(
            self.fees,
            self.config.min_profit_pct,
            self.config.slippage_buffer_pct,
        );
        let enricher = Enricher::new(
            scorer,
            self.explainer,
            self.config.score_timeout(),
            self.config.explain_timeout(),
            self.config.neutral_score,
        );

        Ok(Detector {
            sources,
            symbols,
            calculator,
            history: PriceHistory::new(self.config.history_len),
            config: self.config,
            cache,
            cooldowns: Cooldowns::new(),
            fatal_cooldowns: self.fatal_cooldowns,
            enricher,
            publisher,
            cycle: Mutex::new(0),
            phase: RwLock::new(CyclePhase::Idle),
        })
    }
}
