//! Cross-exchange spread arithmetic.
//!
//! All arithmetic is checked `Decimal`; percentages are rounded to
//! [`PERCENT_DP`] places once, when the gross spread is computed. A pair
//! whose prices are too far apart to represent yields no candidate.

use rust_decimal::Decimal;

use super::fee::FeeSchedule;
use super::id::ExchangeId;
use super::opportunity::{CandidateParts, Direction, OpportunityCandidate};
use super::quote::{Price, Quote};

/// Decimal places kept on spread percentages.
pub const PERCENT_DP: u32 = 6;

const PROFIT_DP: u32 = 8;

/// Gross spread in percent for buying at `buy` and selling at `sell`.
///
/// `None` when `buy` is not positive or the result overflows.
pub fn gross_spread_pct(buy: Price, sell: Price) -> Option<Decimal> {
    if buy <= Decimal::ZERO {
        return None;
    }
    let pct = sell
        .checked_sub(buy)?
        .checked_div(buy)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    Some(pct.round_dp(PERCENT_DP))
}

/// Both directional gross spreads for a pair of quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionalSpreads {
    /// Buy at A's ask, sell at B's bid.
    pub a_to_b: Decimal,
    /// Buy at B's ask, sell at A's bid.
    pub b_to_a: Decimal,
}

impl DirectionalSpreads {
    pub fn of(a: &Quote, b: &Quote) -> Option<Self> {
        Some(Self {
            a_to_b: gross_spread_pct(a.ask(), b.bid())?,
            b_to_a: gross_spread_pct(b.ask(), a.bid())?,
        })
    }
}

/// Turns a pair of same-symbol quotes into at most one candidate.
#[derive(Debug, Clone)]
pub struct SpreadCalculator {
    fees: FeeSchedule,
    min_profit_pct: Decimal,
    slippage_buffer_pct: Decimal,
}

impl SpreadCalculator {
    /// `min_profit_pct` is compared against the fee-adjusted spread after
    /// subtracting `slippage_buffer_pct`.
    pub fn new(fees: FeeSchedule, min_profit_pct: Decimal, slippage_buffer_pct: Decimal) -> Self {
        Self {
            fees,
            min_profit_pct,
            slippage_buffer_pct,
        }
    }

    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    pub fn min_profit_pct(&self) -> Decimal {
        self.min_profit_pct
    }

    /// Pick the more profitable direction and return a candidate if it
    /// clears the profit threshold after fees.
    ///
    /// Returns `None` for quotes of different symbols, quotes from the
    /// same exchange, prices whose spread overflows, no positive gross
    /// spread in either direction, or a fee-adjusted spread at or below the
    /// threshold. Direction A→B wins a tie.
    pub fn compute_spread(&self, a: &Quote, b: &Quote) -> Option<OpportunityCandidate> {
        if a.symbol() != b.symbol() || a.exchange() == b.exchange() {
            return None;
        }

        let spreads = DirectionalSpreads::of(a, b)?;
        let (buy, sell, gross) = if spreads.b_to_a > spreads.a_to_b {
            (b, a, spreads.b_to_a)
        } else {
            (a, b, spreads.a_to_b)
        };

        if gross <= Decimal::ZERO {
            return None;
        }

        let buy_fee_pct = self.fees.percent_for(buy);
        let sell_fee_pct = self.fees.percent_for(sell);
        let fee_adjusted = gross.checked_sub(buy_fee_pct.checked_add(sell_fee_pct)?)?;

        if fee_adjusted.checked_sub(self.slippage_buffer_pct)? <= self.min_profit_pct {
            return None;
        }
        let net_profit_per_unit = self.net_profit_per_unit(buy, sell)?;

        Some(OpportunityCandidate::from_parts(CandidateParts {
            symbol: a.symbol().clone(),
            direction: direction(buy.exchange(), sell.exchange()),
            buy_price: buy.ask(),
            sell_price: sell.bid(),
            gross_spread_pct: gross,
            fee_adjusted_spread_pct: fee_adjusted,
            buy_fee_pct,
            sell_fee_pct,
            net_profit_per_unit,
            executable_volume: buy.ask_size().zip(sell.bid_size()).map(|(a, b)| a.min(b)),
            buy_quoted_at: buy.timestamp(),
            sell_quoted_at: sell.timestamp(),
        }))
    }

    /// `sell * (1 - sell_fee) - buy * (1 + buy_fee)` for one unit.
    fn net_profit_per_unit(&self, buy: &Quote, sell: &Quote) -> Option<Price> {
        let proceeds = sell
            .bid()
            .checked_mul(Decimal::ONE.checked_sub(self.fees.rate_for(sell))?)?;
        let cost = buy
            .ask()
            .checked_mul(Decimal::ONE.checked_add(self.fees.rate_for(buy))?)?;
        Some(proceeds.checked_sub(cost)?.round_dp(PROFIT_DP))
    }
}

fn direction(buy: &ExchangeId, sell: &ExchangeId) -> Direction {
    Direction {
        buy: buy.clone(),
        sell: sell.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Symbol;
    use rust_decimal_macros::dec;

    fn quote(exchange: &str, bid: Decimal, ask: Decimal) -> Quote {
        Quote::builder(ExchangeId::new(exchange), Symbol::parse("BTC/USD").unwrap())
            .bid(bid)
            .ask(ask)
            .build()
            .unwrap()
    }

    fn fees(a: Decimal, b: Decimal) -> FeeSchedule {
        FeeSchedule::new()
            .with_rate(ExchangeId::new("a"), a)
            .unwrap()
            .with_rate(ExchangeId::new("b"), b)
            .unwrap()
    }

    fn calculator(threshold: Decimal) -> SpreadCalculator {
        SpreadCalculator::new(fees(dec!(0.001), dec!(0.001)), threshold, Decimal::ZERO)
    }

    #[test]
    fn reference_scenario_kept_at_one_percent() {
        let a = quote("a", dec!(100.00), dec!(100.10));
        let b = quote("b", dec!(102.00), dec!(102.20));

        let candidate = calculator(dec!(1.0)).compute_spread(&a, &b).unwrap();

        assert_eq!(candidate.buy_exchange().as_str(), "a");
        assert_eq!(candidate.sell_exchange().as_str(), "b");
        assert_eq!(candidate.buy_price(), dec!(100.10));
        assert_eq!(candidate.sell_price(), dec!(102.00));
        assert_eq!(candidate.gross_spread_pct().round_dp(3), dec!(1.898));
        assert_eq!(candidate.fee_adjusted_spread_pct().round_dp(3), dec!(1.698));
        assert_eq!(
            candidate.fee_adjusted_spread_pct(),
            candidate.gross_spread_pct() - dec!(0.2)
        );
    }

    #[test]
    fn reference_scenario_dropped_at_two_percent() {
        let a = quote("a", dec!(100.00), dec!(100.10));
        let b = quote("b", dec!(102.00), dec!(102.20));

        assert!(calculator(dec!(2.0)).compute_spread(&a, &b).is_none());
    }

    #[test]
    fn picks_reverse_direction_when_larger() {
        let a = quote("a", dec!(105.00), dec!(105.10));
        let b = quote("b", dec!(100.00), dec!(100.20));

        let candidate = calculator(dec!(0.5)).compute_spread(&a, &b).unwrap();

        assert_eq!(candidate.buy_exchange().as_str(), "b");
        assert_eq!(candidate.sell_exchange().as_str(), "a");
        assert_eq!(candidate.buy_price(), dec!(100.20));
        assert_eq!(candidate.sell_price(), dec!(105.00));
    }

    #[test]
    fn overlapping_books_yield_nothing() {
        let a = quote("a", dec!(100.00), dec!(100.10));
        let b = quote("b", dec!(100.05), dec!(100.15));

        assert!(calculator(Decimal::ZERO).compute_spread(&a, &b).is_none());
    }

    #[test]
    fn identical_zero_width_quotes_yield_nothing() {
        let a = quote("a", dec!(100), dec!(100));
        let b = quote("b", dec!(100), dec!(100));

        let spreads = DirectionalSpreads::of(&a, &b).unwrap();
        assert_eq!(spreads.a_to_b, Decimal::ZERO);
        assert_eq!(spreads.b_to_a, Decimal::ZERO);
        assert!(calculator(Decimal::ZERO).compute_spread(&a, &b).is_none());
    }

    #[test]
    fn fees_can_eat_the_whole_spread() {
        let a = quote("a", dec!(100.00), dec!(100.00));
        let b = quote("b", dec!(100.30), dec!(100.40));
        let calc = SpreadCalculator::new(fees(dec!(0.001), dec!(0.0026)), dec!(0), dec!(0));

        assert!(calc.compute_spread(&a, &b).is_none());
    }

    #[test]
    fn slippage_buffer_tightens_threshold() {
        let a = quote("a", dec!(100.00), dec!(100.10));
        let b = quote("b", dec!(102.00), dec!(102.20));
        let calc = SpreadCalculator::new(fees(dec!(0.001), dec!(0.001)), dec!(1.0), dec!(0.7));

        assert!(calc.compute_spread(&a, &b).is_none());
    }

    #[test]
    fn mismatched_inputs_are_rejected() {
        let a = quote("a", dec!(100), dec!(101));
        let same_exchange = quote("a", dec!(110), dec!(111));
        let other_symbol = Quote::builder(ExchangeId::new("b"), Symbol::parse("ETH/USD").unwrap())
            .bid(dec!(110))
            .ask(dec!(111))
            .build()
            .unwrap();

        assert!(calculator(dec!(0)).compute_spread(&a, &same_exchange).is_none());
        assert!(calculator(dec!(0)).compute_spread(&a, &other_symbol).is_none());
    }

    #[test]
    fn buy_is_always_below_sell_and_fees_never_raise_spread() {
        let calc = calculator(dec!(-100));
        let prices = [dec!(99.5), dec!(100), dec!(100.25), dec!(101), dec!(103.7)];
        let widths = [dec!(0), dec!(0.05), dec!(0.5)];

        for &bid_a in &prices {
            for &bid_b in &prices {
                for &wa in &widths {
                    for &wb in &widths {
                        let a = quote("a", bid_a, bid_a + wa);
                        let b = quote("b", bid_b, bid_b + wb);
                        if let Some(c) = calc.compute_spread(&a, &b) {
                            assert!(c.buy_price() < c.sell_price());
                            assert!(c.fee_adjusted_spread_pct() <= c.gross_spread_pct());
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn extreme_price_ratio_yields_nothing_instead_of_overflowing() {
        let a = quote("a", dec!(0.0000000000000000000001), dec!(0.0000000000000000000001));
        let b = quote("b", dec!(10000000000), dec!(10000000000));

        assert_eq!(gross_spread_pct(a.ask(), b.bid()), None);
        assert!(calculator(dec!(1)).compute_spread(&a, &b).is_none());
        assert!(calculator(dec!(1)).compute_spread(&b, &a).is_none());
    }

    #[test]
    fn near_maximum_prices_do_not_panic() {
        let a = quote("a", dec!(1), dec!(1));
        let b = quote("b", Decimal::MAX, Decimal::MAX);

        assert!(calculator(dec!(1)).compute_spread(&a, &b).is_none());
    }

    #[test]
    fn net_profit_and_volume_required() {
        let a = Quote::builder(ExchangeId::new("a"), Symbol::parse("BTC/USD").unwrap())
            .bid(dec!(99))
            .ask(dec!(100))
            .ask_size(dec!(3))
            .build()
            .unwrap();
        let b = Quote::builder(ExchangeId::new("b"), Symbol::parse("BTC/USD").unwrap())
            .bid(dec!(110))
            .ask(dec!(111))
            .bid_size(dec!(2))
            .build()
            .unwrap();

        let c = calculator(dec!(1)).compute_spread(&a, &b).unwrap();

        // 110 * 0.999 - 100 * 1.001 = 109.89 - 100.1
        assert_eq!(c.net_profit_per_unit(), dec!(9.79));
        assert_eq!(c.executable_volume(), Some(dec!(2)));
        assert_eq!(c.executable_notional(), Some(dec!(200)));
        assert!(c.min_volume_required().unwrap() > dec!(0.102));
    }
}
