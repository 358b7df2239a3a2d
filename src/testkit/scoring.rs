//! Stub [`Scorer`] and [`Explainer`] implementations.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{OpportunityCandidate, ScoredOpportunity};
use crate::error::{Error, Result};
use crate::port::{Explainer, MarketFeatures, Scorer};

/// Returns the same score for every candidate.
pub struct FixedScorer {
    score: f64,
    calls: Arc<AtomicU32>,
}

impl FixedScorer {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Scorer for FixedScorer {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn score(&self, _: &OpportunityCandidate, _: &MarketFeatures) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.score)
    }
}

/// Always reports the model as unavailable.
pub struct FailingScorer;

#[async_trait]
impl Scorer for FailingScorer {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn score(&self, _: &OpportunityCandidate, _: &MarketFeatures) -> Result<f64> {
        Err(Error::Scoring("model offline".to_string()))
    }
}

/// Sleeps before answering; pair with a shorter score timeout.
pub struct SlowScorer {
    pub delay: Duration,
    pub score: f64,
}

#[async_trait]
impl Scorer for SlowScorer {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn score(&self, _: &OpportunityCandidate, _: &MarketFeatures) -> Result<f64> {
        tokio::time::sleep(self.delay).await;
        Ok(self.score)
    }
}

/// Returns a fixed text.
pub struct StaticExplainer(pub String);

#[async_trait]
impl Explainer for StaticExplainer {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn explain(&self, _: &ScoredOpportunity) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Always fails.
pub struct FailingExplainer;

#[async_trait]
impl Explainer for FailingExplainer {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn explain(&self, _: &ScoredOpportunity) -> Result<String> {
        Err(Error::Explain("generator offline".to_string()))
    }
}
