//! Per-cycle detection results handed to presentation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{ExchangeId, ScoredOpportunity, Symbol};

/// Freshness indicator for one exchange after a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStatus {
    /// Fresh quotes for every tracked symbol, no fetch errors.
    Available,
    /// Some fresh quotes, but errors, timeouts or gaps this cycle.
    Degraded,
    /// No fresh quote for any tracked symbol.
    Unavailable,
}

impl ExchangeStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Degraded => "degraded",
            Self::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeHealth {
    pub exchange: ExchangeId,
    pub status: ExchangeStatus,
    /// Tracked symbols with a fresh quote in this cycle's snapshot.
    pub fresh_quotes: usize,
    /// Symbols whose fetch failed this cycle.
    pub failed_symbols: usize,
    /// Symbols skipped because of a fatal-error cool-down.
    pub cooling_down: usize,
    /// True if the fetch did not finish before the cycle deadline.
    pub timed_out: bool,
    pub last_error: Option<String>,
}

/// Why a symbol produced no opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// No cached quote on this exchange.
    Missing { exchange: ExchangeId },
    /// Cached quote older than the freshness window.
    Stale { exchange: ExchangeId },
    /// No direction clears the fee-adjusted profit threshold.
    BelowThreshold,
    /// Executable notional under the configured liquidity floor.
    Illiquid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub symbol: Symbol,
    #[serde(flatten)]
    pub reason: SkipReason,
}

impl Skipped {
    pub fn new(symbol: Symbol, reason: SkipReason) -> Self {
        Self { symbol, reason }
    }
}

/// Overall result class of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleOutcome {
    Opportunities,
    /// Prices were available but nothing cleared the filters.
    NoOpportunities,
    /// No symbol had fresh quotes on both exchanges.
    NoData,
}

/// Everything one detection cycle produced.
///
/// Published atomically: consumers see either the previous report or this
/// one, never a mix.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Ranked best first.
    pub opportunities: Vec<ScoredOpportunity>,
    pub health: Vec<ExchangeHealth>,
    pub skipped: Vec<Skipped>,
    /// Symbols that had fresh quotes on both exchanges.
    pub priced_symbols: usize,
}

impl CycleReport {
    /// Placeholder published before the first cycle completes.
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            cycle: 0,
            started_at: now,
            completed_at: now,
            opportunities: Vec::new(),
            health: Vec::new(),
            skipped: Vec::new(),
            priced_symbols: 0,
        }
    }

    pub fn outcome(&self) -> CycleOutcome {
        if !self.opportunities.is_empty() {
            CycleOutcome::Opportunities
        } else if self.priced_symbols > 0 {
            CycleOutcome::NoOpportunities
        } else {
            CycleOutcome::NoData
        }
    }

    pub fn health_of(&self, exchange: &ExchangeId) -> Option<&ExchangeHealth> {
        self.health.iter().find(|h| &h.exchange == exchange)
    }

    pub fn skipped_for<'a>(&'a self, symbol: &'a Symbol) -> impl Iterator<Item = &'a SkipReason> + 'a {
        self.skipped
            .iter()
            .filter(move |s| &s.symbol == symbol)
            .map(|s| &s.reason)
    }

    pub fn duration(&self) -> chrono::Duration {
        self.completed_at - self.started_at
    }
}
