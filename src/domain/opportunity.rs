//! Opportunity records produced by a detection cycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::id::{ExchangeId, Symbol};
use super::quote::{Price, Volume};

/// Which exchange to buy on and which to sell on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Direction {
    pub buy: ExchangeId,
    pub sell: ExchangeId,
}

/// A fee-adjusted cross-exchange price gap for one symbol.
///
/// Only [`SpreadCalculator`](super::SpreadCalculator) creates these, which
/// guarantees `buy_price < sell_price` and
/// `fee_adjusted_spread_pct == gross_spread_pct - (buy_fee_pct + sell_fee_pct)`.
/// Candidates live for a single cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityCandidate {
    symbol: Symbol,
    direction: Direction,
    buy_price: Price,
    sell_price: Price,
    gross_spread_pct: Decimal,
    fee_adjusted_spread_pct: Decimal,
    buy_fee_pct: Decimal,
    sell_fee_pct: Decimal,
    net_profit_per_unit: Price,
    executable_volume: Option<Volume>,
    buy_quoted_at: DateTime<Utc>,
    sell_quoted_at: DateTime<Utc>,
}

/// Raw parts of a candidate, filled in by the spread calculator.
pub(super) struct CandidateParts {
    pub symbol: Symbol,
    pub direction: Direction,
    pub buy_price: Price,
    pub sell_price: Price,
    pub gross_spread_pct: Decimal,
    pub fee_adjusted_spread_pct: Decimal,
    pub buy_fee_pct: Decimal,
    pub sell_fee_pct: Decimal,
    pub net_profit_per_unit: Price,
    pub executable_volume: Option<Volume>,
    pub buy_quoted_at: DateTime<Utc>,
    pub sell_quoted_at: DateTime<Utc>,
}

impl OpportunityCandidate {
    pub(super) fn from_parts(parts: CandidateParts) -> Self {
        debug_assert!(parts.buy_price < parts.sell_price);
        Self {
            symbol: parts.symbol,
            direction: parts.direction,
            buy_price: parts.buy_price,
            sell_price: parts.sell_price,
            gross_spread_pct: parts.gross_spread_pct,
            fee_adjusted_spread_pct: parts.fee_adjusted_spread_pct,
            buy_fee_pct: parts.buy_fee_pct,
            sell_fee_pct: parts.sell_fee_pct,
            net_profit_per_unit: parts.net_profit_per_unit,
            executable_volume: parts.executable_volume,
            buy_quoted_at: parts.buy_quoted_at,
            sell_quoted_at: parts.sell_quoted_at,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn direction(&self) -> &Direction {
        &self.direction
    }

    pub fn buy_exchange(&self) -> &ExchangeId {
        &self.direction.buy
    }

    pub fn sell_exchange(&self) -> &ExchangeId {
        &self.direction.sell
    }

    /// Ask on the buy exchange.
    pub fn buy_price(&self) -> Price {
        self.buy_price
    }

    /// Bid on the sell exchange.
    pub fn sell_price(&self) -> Price {
        self.sell_price
    }

    /// `(sell - buy) / buy * 100`.
    pub fn gross_spread_pct(&self) -> Decimal {
        self.gross_spread_pct
    }

    /// Gross spread minus both taker fees, in percent.
    pub fn fee_adjusted_spread_pct(&self) -> Decimal {
        self.fee_adjusted_spread_pct
    }

    pub fn buy_fee_pct(&self) -> Decimal {
        self.buy_fee_pct
    }

    pub fn sell_fee_pct(&self) -> Decimal {
        self.sell_fee_pct
    }

    /// Quote-currency profit for one unit of base asset after fees.
    pub fn net_profit_per_unit(&self) -> Price {
        self.net_profit_per_unit
    }

    /// Units needed to make one unit of quote currency, if profitable at all.
    pub fn min_volume_required(&self) -> Option<Volume> {
        (self.net_profit_per_unit > Decimal::ZERO)
            .then(|| (Decimal::ONE / self.net_profit_per_unit).round_dp(8))
    }

    /// Smaller of ask size on the buy side and bid size on the sell side.
    pub fn executable_volume(&self) -> Option<Volume> {
        self.executable_volume
    }

    /// Notional of [`executable_volume`](Self::executable_volume) at the buy price,
    /// saturating at `Decimal::MAX`.
    pub fn executable_notional(&self) -> Option<Price> {
        self.executable_volume.map(|v| v.saturating_mul(self.buy_price))
    }

    pub fn buy_quoted_at(&self) -> DateTime<Utc> {
        self.buy_quoted_at
    }

    pub fn sell_quoted_at(&self) -> DateTime<Utc> {
        self.sell_quoted_at
    }

    /// Timestamp of the older of the two quotes.
    pub fn quoted_at(&self) -> DateTime<Utc> {
        self.buy_quoted_at.min(self.sell_quoted_at)
    }
}

/// Market context that is not part of the candidate itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MarketFeatures {
    /// Absolute difference of 24h volume between the two exchanges.
    pub volume_diff: f64,
    /// Std-dev of mid-price percentage changes, max over both exchanges.
    pub volatility_pct: f64,
}

/// A candidate enriched with a confidence score and optional explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredOpportunity {
    #[serde(flatten)]
    candidate: OpportunityCandidate,
    confidence: f64,
    score_degraded: bool,
    features: MarketFeatures,
    explanation: Option<String>,
}

impl ScoredOpportunity {
    /// Attach a confidence score. Scores are clamped into `[0, 1]`.
    pub fn new(candidate: OpportunityCandidate, confidence: f64) -> Self {
        Self {
            candidate,
            confidence: confidence.clamp(0.0, 1.0),
            score_degraded: false,
            features: MarketFeatures::default(),
            explanation: None,
        }
    }

    /// Attach the neutral fallback score used when scoring failed.
    pub fn degraded(candidate: OpportunityCandidate, neutral: f64) -> Self {
        Self {
            score_degraded: true,
            ..Self::new(candidate, neutral)
        }
    }

    /// Attach the market features the score was computed from.
    #[must_use]
    pub fn with_features(mut self, features: MarketFeatures) -> Self {
        self.features = features;
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: Option<String>) -> Self {
        self.explanation = explanation.filter(|text| !text.trim().is_empty());
        self
    }

    pub fn candidate(&self) -> &OpportunityCandidate {
        &self.candidate
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// True when the score is the neutral fallback.
    pub fn score_degraded(&self) -> bool {
        self.score_degraded
    }

    pub fn features(&self) -> &MarketFeatures {
        &self.features
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}
