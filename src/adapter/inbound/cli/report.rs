//! Rendering of cycle reports.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::output;
use crate::application::{CycleOutcome, CycleReport, ExchangeHealth, ExchangeStatus};
use crate::domain::ScoredOpportunity;

#[derive(Tabled)]
struct OpportunityRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Buy")]
    buy: String,
    #[tabled(rename = "Sell")]
    sell: String,
    #[tabled(rename = "Gross %")]
    gross: String,
    #[tabled(rename = "Net %")]
    net: String,
    #[tabled(rename = "Profit/unit")]
    profit: String,
    #[tabled(rename = "Volatility %")]
    volatility: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
}

impl OpportunityRow {
    fn new(rank: usize, opportunity: &ScoredOpportunity) -> Self {
        let c = opportunity.candidate();
        let confidence = format!("{:.0}%", opportunity.confidence() * 100.0);
        Self {
            rank,
            symbol: c.symbol().to_string(),
            buy: format!("{} @ {}", c.buy_exchange(), c.buy_price()),
            sell: format!("{} @ {}", c.sell_exchange(), c.sell_price()),
            gross: format!("{:.3}", c.gross_spread_pct()),
            net: format!("{:.3}", c.fee_adjusted_spread_pct()),
            profit: format!("{:.4}", c.net_profit_per_unit()),
            volatility: format!("{:.2}", opportunity.features().volatility_pct),
            confidence: if opportunity.score_degraded() {
                format!("{confidence}*")
            } else {
                confidence
            },
        }
    }
}

#[derive(Tabled)]
struct HealthRow {
    #[tabled(rename = "Exchange")]
    exchange: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Fresh")]
    fresh: usize,
    #[tabled(rename = "Failed")]
    failed: usize,
    #[tabled(rename = "Cooling")]
    cooling: usize,
}

impl From<&ExchangeHealth> for HealthRow {
    fn from(health: &ExchangeHealth) -> Self {
        let status = match health.status {
            ExchangeStatus::Available => output::positive(health.status.as_str()),
            ExchangeStatus::Degraded => health.status.as_str().to_string(),
            ExchangeStatus::Unavailable => output::negative(health.status.as_str()),
        };
        Self {
            exchange: health.exchange.to_string(),
            status,
            fresh: health.fresh_quotes,
            failed: health.failed_symbols,
            cooling: health.cooling_down,
        }
    }
}

/// Print a report as tables, or as one JSON line with `--json`.
pub fn print(report: &CycleReport) {
    if output::is_json() {
        output::emit("cycle", report);
        return;
    }

    output::section(&format!(
        "Cycle {} at {}",
        report.cycle,
        report.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    match report.outcome() {
        CycleOutcome::Opportunities => {
            let rows: Vec<OpportunityRow> = report
                .opportunities
                .iter()
                .enumerate()
                .map(|(i, o)| OpportunityRow::new(i + 1, o))
                .collect();
            output::lines(&Table::new(rows).with(Style::rounded()).to_string());
            if output::verbosity() > 0 {
                for opportunity in &report.opportunities {
                    if let Some(text) = opportunity.explanation() {
                        output::note(text);
                    }
                }
            }
        }
        CycleOutcome::NoOpportunities => {
            output::note(&format!(
                "No opportunities above threshold across {} priced symbols",
                report.priced_symbols
            ));
        }
        CycleOutcome::NoData => output::warning("No fresh quotes on both exchanges"),
    }

    let health: Vec<HealthRow> = report.health.iter().map(HealthRow::from).collect();
    if !health.is_empty() {
        output::lines(&Table::new(health).with(Style::rounded()).to_string());
    }

    if output::verbosity() > 0 {
        for skipped in &report.skipped {
            output::note(&format!("{} skipped: {:?}", skipped.symbol, skipped.reason));
        }
    }
}
