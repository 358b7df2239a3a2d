//! Loading configuration files from disk.

mod support;

use rust_decimal_macros::dec;

use cryptogap::error::{ConfigError, Error};
use cryptogap::infrastructure::config::{Config, ExchangeKind};
use cryptogap::infrastructure::factory::build_detector;
use cryptogap::testkit::config::SAMPLE_TOML;
use support::config::temp_config;

#[test]
fn sample_file_loads_and_wires_a_detector() {
    let file = temp_config(SAMPLE_TOML);
    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.symbols.len(), 3);
    assert_eq!(config.detector.min_profit_pct, dec!(0.1));
    assert_eq!(config.exchanges[0].kind, ExchangeKind::Binance);
    assert_eq!(config.exchanges[1].kind, ExchangeKind::Kraken);

    let detector = build_detector(&config).unwrap();
    assert_eq!(detector.symbols().len(), 3);
    assert_eq!(detector.exchanges().len(), 2);
}

#[test]
fn missing_file_is_a_read_error() {
    let err = Config::load("/nonexistent/cryptogap.toml").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = temp_config("symbols = [");
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn negative_threshold_is_rejected() {
    let file = temp_config(&SAMPLE_TOML.replace("min_profit_pct = 0.1", "min_profit_pct = -0.5"));
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "detector.min_profit_pct",
            ..
        })
    ));
}

#[test]
fn malformed_symbol_is_rejected_at_parse_time() {
    let file = temp_config(&SAMPLE_TOML.replace("\"SOL/USD\"", "\"SOLUSD\""));
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn single_exchange_is_rejected() {
    let toml = r#"
symbols = ["BTC/USD"]

[[exchange]]
kind = "binance"
"#;
    let file = temp_config(toml);
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "exchange",
            ..
        })
    ));
}
