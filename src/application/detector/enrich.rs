//! Confidence scoring and explanation of ranked candidates.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::timeout;
use tracing::warn;

use crate::domain::{OpportunityCandidate, ScoredOpportunity};
use crate::port::{Explainer, MarketFeatures, Scorer};

/// Wraps the external scorer and explainer with timeouts and fallbacks.
///
/// A failed or slow scorer yields the neutral score with
/// `score_degraded` set; a failed or slow explainer yields no text. Neither
/// ever removes or reorders a candidate.
pub struct Enricher {
    scorer: Arc<dyn Scorer>,
    explainer: Option<Arc<dyn Explainer>>,
    score_timeout: Duration,
    explain_timeout: Duration,
    neutral_score: f64,
}

impl Enricher {
    pub fn new(
        scorer: Arc<dyn Scorer>,
        explainer: Option<Arc<dyn Explainer>>,
        score_timeout: Duration,
        explain_timeout: Duration,
        neutral_score: f64,
    ) -> Self {
        Self {
            scorer,
            explainer,
            score_timeout,
            explain_timeout,
            neutral_score,
        }
    }

    /// Score and explain every candidate, preserving input order.
    pub async fn enrich_all(
        &self,
        candidates: Vec<(OpportunityCandidate, MarketFeatures)>,
    ) -> Vec<ScoredOpportunity> {
        join_all(
            candidates
                .into_iter()
                .map(|(candidate, features)| self.enrich(candidate, features)),
        )
        .await
    }

    pub async fn enrich(
        &self,
        candidate: OpportunityCandidate,
        features: MarketFeatures,
    ) -> ScoredOpportunity {
        let scored = self.score(candidate, &features).await.with_features(features);
        let explanation = self.explain(&scored).await;
        scored.with_explanation(explanation)
    }

    async fn score(
        &self,
        candidate: OpportunityCandidate,
        features: &MarketFeatures,
    ) -> ScoredOpportunity {
        let scorer = self.scorer.name();
        match timeout(self.score_timeout, self.scorer.score(&candidate, features)).await {
            Ok(Ok(score)) if score.is_finite() => ScoredOpportunity::new(candidate, score),
            Ok(Ok(score)) => {
                warn!(scorer, symbol = %candidate.symbol(), score, "Scorer returned non-finite score");
                ScoredOpportunity::degraded(candidate, self.neutral_score)
            }
            Ok(Err(e)) => {
                warn!(scorer, symbol = %candidate.symbol(), error = %e, "Scoring unavailable");
                ScoredOpportunity::degraded(candidate, self.neutral_score)
            }
            Err(_) => {
                warn!(
                    scorer,
                    symbol = %candidate.symbol(),
                    timeout_ms = self.score_timeout.as_millis() as u64,
                    "Scoring timed out"
                );
                ScoredOpportunity::degraded(candidate, self.neutral_score)
            }
        }
    }

    async fn explain(&self, scored: &ScoredOpportunity) -> Option<String> {
        let explainer = self.explainer.as_ref()?;
        let name = explainer.name();
        match timeout(self.explain_timeout, explainer.explain(scored)).await {
            Ok(Ok(text)) => Some(text),
            Ok(Err(e)) => {
                warn!(explainer = name, symbol = %scored.candidate().symbol(), error = %e, "Explanation failed");
                None
            }
            Err(_) => {
                warn!(explainer = name, symbol = %scored.candidate().symbol(), "Explanation timed out");
                None
            }
        }
    }
}
