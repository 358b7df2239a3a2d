//! Template-based opportunity explainer.

use async_trait::async_trait;

use crate::domain::ScoredOpportunity;
use crate::error::Result;
use crate::port::Explainer;

/// Renders a fixed summary of the trade; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateExplainer;

impl TemplateExplainer {
    pub fn render(opportunity: &ScoredOpportunity) -> String {
        let c = opportunity.candidate();
        let features = opportunity.features();
        let volume = c
            .min_volume_required()
            .map_or_else(|| "n/a".to_string(), |v| format!("{:.2} units", v));
        format!(
            "{symbol}: buy on {buy} at {buy_price:.2}, sell on {sell} at {sell_price:.2}. \
             Spread {gross:.2}% ({net:.2}% after fees), net profit {profit:.4} per unit, \
             volume for 1.00 profit {volume}. Volatility {volatility:.2}%, \
             24h volume difference {volume_diff:.0}. Confidence {confidence:.0}%{degraded}. \
             Quoted at {at}.",
            symbol = c.symbol(),
            buy = c.buy_exchange(),
            buy_price = c.buy_price(),
            sell = c.sell_exchange(),
            sell_price = c.sell_price(),
            gross = c.gross_spread_pct(),
            net = c.fee_adjusted_spread_pct(),
            profit = c.net_profit_per_unit(),
            volatility = features.volatility_pct,
            volume_diff = features.volume_diff,
            confidence = opportunity.confidence() * 100.0,
            degraded = if opportunity.score_degraded() {
                " (default, scorer unavailable)"
            } else {
                ""
            },
            at = c.quoted_at().format("%H:%M:%S"),
        )
    }
}

#[async_trait]
impl Explainer for TemplateExplainer {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn explain(&self, opportunity: &ScoredOpportunity) -> Result<String> {
        Ok(Self::render(opportunity))
    }
}
