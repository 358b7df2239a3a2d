//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. It is
//! loaded from a TOML file; `RUST_LOG` (possibly from `.env`) overrides the
//! configured log level.
//!
//! # Example
//!
//! ```no_run
//! use cryptogap::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::exchange::{ExchangeConfig, ExchangeKind};
use super::logging::LoggingConfig;
use crate::adapter::outbound::scorer::ScoreWeights;
use crate::application::detector::DetectorConfig;
use crate::domain::Symbol;
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Canonical pairs to track, e.g. `"BTC/USD"`.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<Symbol>,

    /// Cycle timing, thresholds and scoring fallbacks.
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Exactly two `[[exchange]]` tables.
    #[serde(default = "default_exchanges", rename = "exchange")]
    pub exchanges: Vec<ExchangeConfig>,

    /// Weights for the built-in heuristic scorer.
    #[serde(default)]
    pub scoring: ScoreWeights,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_symbols() -> Vec<Symbol> {
    ["BTC/USD", "ETH/USD", "SOL/USD", "XRP/USD", "ADA/USD"]
        .iter()
        .filter_map(|s| Symbol::parse(s).ok())
        .collect()
}

fn default_exchanges() -> Vec<ExchangeConfig> {
    vec![
        ExchangeConfig::new(ExchangeKind::Binance),
        ExchangeConfig::new(ExchangeKind::Kraken),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            detector: DetectorConfig::default(),
            exchanges: default_exchanges(),
            scoring: ScoreWeights::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed or
    /// validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Install the global tracing subscriber.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(ConfigError::MissingField { field: "symbols" }.into());
        }
        let mut seen = HashSet::new();
        for symbol in &self.symbols {
            if !seen.insert(symbol) {
                return Err(invalid("symbols", format!("duplicate symbol {symbol}")));
            }
        }

        self.detector.validate()?;

        if self.exchanges.len() != 2 {
            return Err(invalid(
                "exchange",
                format!("exactly two exchanges required, got {}", self.exchanges.len()),
            ));
        }
        let ids: HashSet<_> = self.exchanges.iter().map(ExchangeConfig::exchange_id).collect();
        if ids.len() != self.exchanges.len() {
            return Err(invalid("exchange.id", "exchange ids must be distinct".to_string()));
        }
        for exchange in &self.exchanges {
            validate_exchange(exchange)?;
        }

        let w = &self.scoring;
        if w.spread < 0.0 || w.volume < 0.0 || w.stability < 0.0 {
            return Err(invalid("scoring", "weights must be >= 0".to_string()));
        }
        if w.spread + w.volume + w.stability <= 0.0 {
            return Err(invalid("scoring", "at least one weight must be > 0".to_string()));
        }

        Ok(())
    }
}

#[allow(clippy::result_large_err)]
fn validate_exchange(exchange: &ExchangeConfig) -> Result<()> {
    let fee = exchange.taker_fee();
    if fee < Decimal::ZERO || fee >= Decimal::ONE {
        return Err(invalid("exchange.taker_fee", format!("{fee} is not within [0, 1)")));
    }
    if url::Url::parse(exchange.api_url()).is_err() {
        return Err(invalid(
            "exchange.api_url",
            format!("'{}' is not a valid URL", exchange.api_url()),
        ));
    }
    if exchange.request_timeout_ms == 0 {
        return Err(invalid("exchange.request_timeout_ms", "must be > 0".to_string()));
    }
    if exchange.requests_per_second() == 0 {
        return Err(invalid("exchange.requests_per_second", "must be > 0".to_string()));
    }
    if exchange.fatal_cooldown_secs == 0 {
        return Err(invalid("exchange.fatal_cooldown_secs", "must be > 0".to_string()));
    }
    let backoff = &exchange.backoff;
    if backoff.initial_delay_ms == 0 {
        return Err(invalid("exchange.backoff.initial_delay_ms", "must be > 0".to_string()));
    }
    if backoff.max_delay_ms < backoff.initial_delay_ms {
        return Err(invalid(
            "exchange.backoff.max_delay_ms",
            "must be >= initial_delay_ms".to_string(),
        ));
    }
    if backoff.multiplier < 1.0 {
        return Err(invalid("exchange.backoff.multiplier", "must be >= 1.0".to_string()));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: String) -> crate::error::Error {
    ConfigError::InvalidValue { field, reason }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    const MINIMAL: &str = r#"
symbols = ["btc/usd", "ETH/USD"]

[[exchange]]
kind = "binance"

[[exchange]]
kind = "kraken"
taker_fee = 0.0026

[exchange.symbol_overrides]
"BTC/USD" = "XBTUSD"
"#;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config = Config::parse_toml(MINIMAL).unwrap();

        assert_eq!(config.symbols[0].as_str(), "BTC/USD");
        assert_eq!(config.detector.min_profit_pct, dec!(0.1));
        assert_eq!(config.detector.freshness_window_secs, 10);
        assert_eq!(config.exchanges[0].kind, ExchangeKind::Binance);
        assert_eq!(config.exchanges[0].taker_fee(), dec!(0.001));
        assert_eq!(config.exchanges[1].taker_fee(), dec!(0.0026));
        assert_eq!(
            config.exchanges[1]
                .symbol_overrides
                .get(&Symbol::parse("BTC/USD").unwrap())
                .map(String::as_str),
            Some("XBTUSD")
        );
        assert_eq!(config.scoring, ScoreWeights::default());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_single_exchange() {
        let toml = r#"
symbols = ["BTC/USD"]
[[exchange]]
kind = "binance"
"#;
        let err = Config::parse_toml(toml).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "exchange", .. })
        ));
    }

    #[test]
    fn rejects_duplicate_exchange_ids() {
        let toml = r#"
symbols = ["BTC/USD"]
[[exchange]]
kind = "binance"
[[exchange]]
kind = "binance"
"#;
        let err = Config::parse_toml(toml).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "exchange.id", .. })
        ));
    }

    #[test]
    fn rejects_duplicate_symbols() {
        let toml = r#"
symbols = ["BTC/USD", "btc/usd"]
"#;
        assert!(Config::parse_toml(toml).is_err());
    }

    #[test]
    fn rejects_empty_symbols() {
        let err = Config::parse_toml("symbols = []").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField { field: "symbols" })
        ));
    }

    #[test]
    fn rejects_malformed_symbol() {
        let err = Config::parse_toml(r#"symbols = ["BTCUSD"]"#).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn rejects_fee_of_one_hundred_percent() {
        let toml = r#"
symbols = ["BTC/USD"]
[[exchange]]
kind = "binance"
taker_fee = 1.0
[[exchange]]
kind = "kraken"
"#;
        assert!(Config::parse_toml(toml).is_err());
    }

    #[test]
    fn rejects_negative_threshold() {
        let toml = r#"
[detector]
min_profit_pct = -1.0
"#;
        let err = Config::parse_toml(toml).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "detector.min_profit_pct", .. })
        ));
    }
}
