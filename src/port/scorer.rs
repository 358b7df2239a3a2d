//! Confidence scoring port.

use async_trait::async_trait;
pub use crate::domain::MarketFeatures;
use crate::domain::OpportunityCandidate;
use crate::error::Result;

/// Confidence model for opportunities.
///
/// Treated as blocking I/O by the detector: every call is bounded by a
/// timeout and any failure degrades to a neutral score.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Scorer name for logging.
    fn name(&self) -> &'static str;

    /// Score a candidate in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Implementations return [`Error::Scoring`](crate::error::Error::Scoring)
    /// when the model is unavailable.
    async fn score(&self, candidate: &OpportunityCandidate, features: &MarketFeatures)
        -> Result<f64>;
}
