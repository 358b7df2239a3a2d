//! Heuristic confidence scorer.
//!
//! Weighs three factors, each normalized to 0-100:
//! - **Spread**: gross spread in percent × 20, so a 5% gap saturates
//! - **Volume**: 24h volume difference / 10 000
//! - **Stability**: 100 minus a volatility penalty (volatility × 10, capped at 50)
//!
//! The weighted sum is divided by 100 to land in `[0, 1]`.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use crate::domain::OpportunityCandidate;
use crate::error::Result;
use crate::port::{MarketFeatures, Scorer};

/// Factor weights for [`HeuristicScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_spread_weight")]
    pub spread: f64,
    #[serde(default = "default_volume_weight")]
    pub volume: f64,
    #[serde(default = "default_stability_weight")]
    pub stability: f64,
}

fn default_spread_weight() -> f64 {
    0.4
}

fn default_volume_weight() -> f64 {
    0.4
}

fn default_stability_weight() -> f64 {
    0.2
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            spread: default_spread_weight(),
            volume: default_volume_weight(),
            stability: default_stability_weight(),
        }
    }
}

/// Rule-based stand-in for a trained confidence model.
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer {
    weights: ScoreWeights,
}

impl HeuristicScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Synchronous scoring, shared by the async trait method.
    pub fn score_now(&self, candidate: &OpportunityCandidate, features: &MarketFeatures) -> f64 {
        let gross = candidate.gross_spread_pct().to_f64().unwrap_or(0.0);
        let spread_score = (gross * 20.0).clamp(0.0, 100.0);
        let volume_score = (features.volume_diff / 10_000.0).clamp(0.0, 100.0);
        let volatility_penalty = (features.volatility_pct * 10.0).clamp(0.0, 50.0);

        let weighted = spread_score * self.weights.spread
            + volume_score * self.weights.volume
            + (100.0 - volatility_penalty) * self.weights.stability;
        let weight_sum = self.weights.spread + self.weights.volume + self.weights.stability;

        if weight_sum <= 0.0 {
            return 0.0;
        }
        (weighted / weight_sum / 100.0).clamp(0.0, 1.0)
    }
}

#[async_trait]
impl Scorer for HeuristicScorer {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn score(
        &self,
        candidate: &OpportunityCandidate,
        features: &MarketFeatures,
    ) -> Result<f64> {
        Ok(self.score_now(candidate, features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExchangeId, FeeSchedule, Quote, SpreadCalculator, Symbol};
    use rust_decimal_macros::dec;

    fn candidate() -> OpportunityCandidate {
        let quote = |ex: &str, bid, ask| {
            Quote::builder(ExchangeId::new(ex), Symbol::parse("BTC/USD").unwrap())
                .bid(bid)
                .ask(ask)
                .build()
                .unwrap()
        };
        // Gross spread exactly 2%.
        SpreadCalculator::new(FeeSchedule::new(), dec!(0), dec!(0))
            .compute_spread(&quote("a", dec!(99), dec!(100)), &quote("b", dec!(102), dec!(103)))
            .unwrap()
    }

    #[test]
    fn matches_weighted_formula() {
        let features = MarketFeatures {
            volume_diff: 200_000.0,
            volatility_pct: 1.5,
        };
        let score = HeuristicScorer::default().score_now(&candidate(), &features);

        // 0.4 * 40 + 0.4 * 20 + 0.2 * 85 = 41
        assert!((score - 0.41).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn saturates_within_unit_interval() {
        let features = MarketFeatures {
            volume_diff: 1e12,
            volatility_pct: 0.0,
        };
        let score = HeuristicScorer::new(ScoreWeights {
            spread: 0.0,
            volume: 1.0,
            stability: 0.0,
        })
        .score_now(&candidate(), &features);

        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_weights_score_zero() {
        let scorer = HeuristicScorer::new(ScoreWeights {
            spread: 0.0,
            volume: 0.0,
            stability: 0.0,
        });
        assert_eq!(scorer.score_now(&candidate(), &MarketFeatures::default()), 0.0);
    }
}
