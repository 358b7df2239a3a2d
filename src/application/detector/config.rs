//! Detector configuration.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigError;

/// Tuning for the detection cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// Minimum fee-adjusted spread, in percent, for a candidate to survive.
    #[serde(default = "default_min_profit_pct")]
    pub min_profit_pct: Decimal,
    /// Extra percentage subtracted before the threshold check to cover slippage.
    #[serde(default)]
    pub slippage_buffer_pct: Decimal,
    /// Quotes older than this are stale and excluded from detection.
    #[serde(default = "default_freshness_window_secs")]
    pub freshness_window_secs: u64,
    /// Time between the starts of consecutive cycles. A cycle that overruns
    /// it delays the next start instead of overlapping.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Overall fetch deadline; the cycle proceeds with cached data after it.
    #[serde(default = "default_cycle_deadline_ms")]
    pub cycle_deadline_ms: u64,
    /// Minimum executable notional (quote currency). Unset disables the filter.
    #[serde(default)]
    pub min_liquidity_notional: Option<Decimal>,
    #[serde(default = "default_score_timeout_ms")]
    pub score_timeout_ms: u64,
    #[serde(default = "default_explain_timeout_ms")]
    pub explain_timeout_ms: u64,
    /// Confidence assigned when the scorer fails or times out.
    #[serde(default = "default_neutral_score")]
    pub neutral_score: f64,
    /// Mid prices kept per (exchange, symbol) for volatility.
    #[serde(default = "default_history_len")]
    pub history_len: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_profit_pct: default_min_profit_pct(),
            slippage_buffer_pct: Decimal::ZERO,
            freshness_window_secs: default_freshness_window_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            cycle_deadline_ms: default_cycle_deadline_ms(),
            min_liquidity_notional: None,
            score_timeout_ms: default_score_timeout_ms(),
            explain_timeout_ms: default_explain_timeout_ms(),
            neutral_score: default_neutral_score(),
            history_len: default_history_len(),
        }
    }
}

impl DetectorConfig {
    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.freshness_window_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn cycle_deadline(&self) -> Duration {
        Duration::from_millis(self.cycle_deadline_ms)
    }

    pub fn score_timeout(&self) -> Duration {
        Duration::from_millis(self.score_timeout_ms)
    }

    pub fn explain_timeout(&self) -> Duration {
        Duration::from_millis(self.explain_timeout_ms)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_profit_pct.is_sign_negative() {
            return Err(invalid("detector.min_profit_pct", "must be >= 0"));
        }
        if self.slippage_buffer_pct.is_sign_negative() {
            return Err(invalid("detector.slippage_buffer_pct", "must be >= 0"));
        }
        if self.freshness_window_secs == 0 {
            return Err(invalid("detector.freshness_window_secs", "must be > 0"));
        }
        if self.poll_interval_secs == 0 {
            return Err(invalid("detector.poll_interval_secs", "must be > 0"));
        }
        if self.cycle_deadline_ms == 0 {
            return Err(invalid("detector.cycle_deadline_ms", "must be > 0"));
        }
        if self.score_timeout_ms == 0 {
            return Err(invalid("detector.score_timeout_ms", "must be > 0"));
        }
        if self.explain_timeout_ms == 0 {
            return Err(invalid("detector.explain_timeout_ms", "must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.neutral_score) {
            return Err(invalid("detector.neutral_score", "must be within [0, 1]"));
        }
        if let Some(notional) = self.min_liquidity_notional {
            if notional.is_sign_negative() {
                return Err(invalid("detector.min_liquidity_notional", "must be >= 0"));
            }
        }
        if self.history_len < 3 {
            return Err(invalid("detector.history_len", "must be >= 3"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

fn default_min_profit_pct() -> Decimal {
    Decimal::new(1, 1)
}

const fn default_freshness_window_secs() -> u64 {
    10
}

const fn default_poll_interval_secs() -> u64 {
    30
}

const fn default_cycle_deadline_ms() -> u64 {
    8_000
}

const fn default_score_timeout_ms() -> u64 {
    1_000
}

const fn default_explain_timeout_ms() -> u64 {
    2_000
}

const fn default_neutral_score() -> f64 {
    0.5
}

const fn default_history_len() -> usize {
    60
}
