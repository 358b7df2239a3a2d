//! Per-exchange adapter configuration.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{ExchangeId, Symbol};

/// Supported exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    Binance,
    Kraken,
}

impl ExchangeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::Kraken => "kraken",
        }
    }

    pub const fn default_api_url(self) -> &'static str {
        match self {
            Self::Binance => "https://api.binance.com",
            Self::Kraken => "https://api.kraken.com",
        }
    }

    /// Standard taker fee as a fraction.
    pub fn default_taker_fee(self) -> Decimal {
        match self {
            Self::Binance => Decimal::new(1, 3),  // 0.1%
            Self::Kraken => Decimal::new(26, 4), // 0.26%
        }
    }

    /// Conservative public-endpoint request rates.
    pub const fn default_requests_per_second(self) -> u32 {
        match self {
            Self::Binance => 10,
            Self::Kraken => 1,
        }
    }
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retry backoff for transient fetch errors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackoffConfig {
    /// Delay before the first retry (milliseconds).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Upper bound on any single delay (milliseconds).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Multiplier applied to the delay after each retry.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_initial_delay_ms() -> u64 {
    250
}

fn default_max_delay_ms() -> u64 {
    2000
}

fn default_multiplier() -> f64 {
    2.0
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

/// One `[[exchange]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    pub kind: ExchangeKind,
    /// Identifier used in quotes and reports; defaults to the kind name.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    /// Taker fee as a fraction (`0.001` is 0.1%).
    #[serde(default)]
    pub taker_fee: Option<Decimal>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub requests_per_second: Option<u32>,
    /// Retries per request for transient errors.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// How long a symbol stays disabled after a fatal error.
    #[serde(default = "default_fatal_cooldown_secs")]
    pub fatal_cooldown_secs: u64,
    /// Canonical symbol to native name, overriding the default mapping.
    #[serde(default)]
    pub symbol_overrides: HashMap<Symbol, String>,
    /// Pairs this exchange does not list.
    #[serde(default)]
    pub unsupported_symbols: Vec<Symbol>,
    #[serde(default)]
    pub backoff: BackoffConfig,
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_max_retries() -> u32 {
    2
}

fn default_fatal_cooldown_secs() -> u64 {
    300
}

impl ExchangeConfig {
    /// Default configuration for an exchange kind.
    pub fn new(kind: ExchangeKind) -> Self {
        Self {
            kind,
            id: None,
            api_url: None,
            taker_fee: None,
            request_timeout_ms: default_request_timeout_ms(),
            requests_per_second: None,
            max_retries: default_max_retries(),
            fatal_cooldown_secs: default_fatal_cooldown_secs(),
            symbol_overrides: HashMap::new(),
            unsupported_symbols: Vec::new(),
            backoff: BackoffConfig::default(),
        }
    }

    pub fn exchange_id(&self) -> ExchangeId {
        ExchangeId::new(self.id.as_deref().unwrap_or(self.kind.as_str()))
    }

    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or(self.kind.default_api_url())
    }

    pub fn taker_fee(&self) -> Decimal {
        self.taker_fee
            .unwrap_or_else(|| self.kind.default_taker_fee())
    }

    pub fn requests_per_second(&self) -> u32 {
        self.requests_per_second
            .unwrap_or(self.kind.default_requests_per_second())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn fatal_cooldown(&self) -> Duration {
        Duration::from_secs(self.fatal_cooldown_secs)
    }
}
