//! Opportunity explanation port.

use async_trait::async_trait;

use crate::domain::ScoredOpportunity;
use crate::error::Result;

/// Turns a scored opportunity into rationale text. Best effort only.
#[async_trait]
pub trait Explainer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn explain(&self, opportunity: &ScoredOpportunity) -> Result<String>;
}
