//! Aggregation, filtering and ranking of spread candidates.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::application::cache::QuoteSnapshot;
use crate::application::report::{SkipReason, Skipped};
use crate::domain::{ExchangeId, OpportunityCandidate, Quote, SpreadCalculator, Symbol};

/// Candidates found in one snapshot plus the symbols that yielded none.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub candidates: Vec<OpportunityCandidate>,
    pub skipped: Vec<Skipped>,
    /// Symbols with fresh quotes on both exchanges.
    pub priced_symbols: usize,
}

/// Run the spread calculator for every symbol that has fresh quotes on both
/// exchanges. Missing or stale sides are recorded, never priced.
pub fn aggregate(
    calculator: &SpreadCalculator,
    snapshot: &QuoteSnapshot,
    symbols: &[Symbol],
    exchanges: [&ExchangeId; 2],
) -> Aggregation {
    let mut out = Aggregation::default();

    for symbol in symbols {
        let a = fresh_side(snapshot, exchanges[0], symbol);
        let b = fresh_side(snapshot, exchanges[1], symbol);
        let (a, b) = match (a, b) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(reason), _) | (_, Err(reason)) => {
                out.skipped.push(Skipped::new(symbol.clone(), reason));
                continue;
            }
        };

        out.priced_symbols += 1;
        match calculator.compute_spread(a, b) {
            Some(candidate) => out.candidates.push(candidate),
            None => out
                .skipped
                .push(Skipped::new(symbol.clone(), SkipReason::BelowThreshold)),
        }
    }

    out
}

fn fresh_side<'a>(
    snapshot: &'a QuoteSnapshot,
    exchange: &ExchangeId,
    symbol: &Symbol,
) -> Result<&'a Quote, SkipReason> {
    match snapshot.entry(exchange, symbol) {
        None => Err(SkipReason::Missing {
            exchange: exchange.clone(),
        }),
        Some(entry) if entry.is_stale() => Err(SkipReason::Stale {
            exchange: exchange.clone(),
        }),
        Some(entry) => Ok(entry.quote()),
    }
}

/// Drop candidates whose executable notional is known and below
/// `min_notional`. Candidates without size data pass.
pub fn filter_liquidity(
    candidates: Vec<OpportunityCandidate>,
    min_notional: Option<Decimal>,
) -> (Vec<OpportunityCandidate>, Vec<Skipped>) {
    let Some(min_notional) = min_notional else {
        return (candidates, Vec::new());
    };

    let mut skipped = Vec::new();
    let kept = candidates
        .into_iter()
        .filter(|candidate| match candidate.executable_notional() {
            Some(notional) if notional < min_notional => {
                skipped.push(Skipped::new(candidate.symbol().clone(), SkipReason::Illiquid));
                false
            }
            _ => true,
        })
        .collect();
    (kept, skipped)
}

/// Sort by fee-adjusted spread descending, then symbol ascending.
pub fn rank(candidates: &mut [OpportunityCandidate]) {
    candidates.sort_by(compare);
}

fn compare(a: &OpportunityCandidate, b: &OpportunityCandidate) -> Ordering {
    b.fee_adjusted_spread_pct()
        .cmp(&a.fee_adjusted_spread_pct())
        .then_with(|| a.symbol().cmp(b.symbol()))
}
