//! Canonical test configurations.

use rust_decimal::Decimal;

use crate::application::DetectorConfig;

/// Detector config with short deadlines so tests never wait long.
pub fn detector(min_profit_pct: Decimal) -> DetectorConfig {
    DetectorConfig {
        min_profit_pct,
        cycle_deadline_ms: 500,
        score_timeout_ms: 100,
        explain_timeout_ms: 100,
        ..DetectorConfig::default()
    }
}

/// A complete, valid configuration file pointing at unreachable hosts.
pub const SAMPLE_TOML: &str = r#"
symbols = ["BTC/USD", "ETH/USD", "SOL/USD"]

[detector]
min_profit_pct = 0.1
freshness_window_secs = 10
poll_interval_secs = 30

[[exchange]]
kind = "binance"
api_url = "http://127.0.0.1:9"

[[exchange]]
kind = "kraken"
api_url = "http://127.0.0.1:9"

[logging]
level = "warn"
"#;
