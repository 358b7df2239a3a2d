//! Static configuration health reporting.

use std::sync::Arc;

use crate::infrastructure::config::settings::Config;
use crate::port::QuoteSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

#[derive(Debug, Clone)]
pub struct HealthCheck {
    name: String,
    critical: bool,
    status: HealthStatus,
}

impl HealthCheck {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn critical(&self) -> bool {
        self.critical
    }

    pub fn status(&self) -> &HealthStatus {
        &self.status
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self.status, HealthStatus::Healthy)
    }
}

#[derive(Debug, Clone)]
pub struct HealthReport {
    checks: Vec<HealthCheck>,
}

impl HealthReport {
    pub fn checks(&self) -> &[HealthCheck] {
        &self.checks
    }

    pub fn is_healthy(&self) -> bool {
        self.checks
            .iter()
            .filter(|check| check.critical())
            .all(HealthCheck::is_healthy)
    }
}

/// Check that every tracked symbol resolves on both exchanges.
///
/// An exchange that cannot represent some symbols is a warning, not a
/// failure; an exchange that can represent none is critical.
pub fn health_check(config: &Config, sources: &[Arc<dyn QuoteSource>]) -> HealthReport {
    let mut checks = vec![HealthCheck {
        name: "symbols".to_string(),
        critical: true,
        status: if config.symbols.is_empty() {
            HealthStatus::Unhealthy("no symbols configured".to_string())
        } else {
            HealthStatus::Healthy
        },
    }];

    for source in sources {
        let unsupported: Vec<String> = config
            .symbols
            .iter()
            .filter(|symbol| source.native_symbol(symbol).is_none())
            .map(ToString::to_string)
            .collect();

        let (critical, status) = if unsupported.is_empty() {
            (false, HealthStatus::Healthy)
        } else if unsupported.len() == config.symbols.len() {
            (
                true,
                HealthStatus::Unhealthy("no tracked symbol is supported".to_string()),
            )
        } else {
            (
                false,
                HealthStatus::Unhealthy(format!("unsupported: {}", unsupported.join(", "))),
            )
        };

        checks.push(HealthCheck {
            name: format!("{}.symbols", source.exchange()),
            critical,
            status,
        });
    }

    HealthReport { checks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExchangeId, Symbol};
    use crate::port::FetchBatch;
    use crate::testkit::source::ScriptedSource;
    use async_trait::async_trait;

    struct NoBtc(ExchangeId);

    #[async_trait]
    impl QuoteSource for NoBtc {
        fn exchange(&self) -> &ExchangeId {
            &self.0
        }

        fn native_symbol(&self, symbol: &Symbol) -> Option<String> {
            (symbol.base() != "BTC").then(|| symbol.as_str().replace('/', ""))
        }

        async fn fetch_quotes(&self, _: &[Symbol]) -> FetchBatch {
            FetchBatch::new()
        }
    }

    fn config(symbols: &[&str]) -> Config {
        Config {
            symbols: crate::testkit::domain::symbols(symbols),
            ..Config::default()
        }
    }

    #[test]
    fn all_symbols_supported_is_healthy() {
        let sources: Vec<Arc<dyn QuoteSource>> = vec![
            Arc::new(ScriptedSource::new("a")),
            Arc::new(ScriptedSource::new("b")),
        ];
        let report = health_check(&config(&["BTC/USD", "ETH/USD"]), &sources);
        assert!(report.is_healthy());
        assert!(report.checks().iter().all(HealthCheck::is_healthy));
    }

    #[test]
    fn partially_unsupported_is_a_warning() {
        let sources: Vec<Arc<dyn QuoteSource>> = vec![
            Arc::new(ScriptedSource::new("a")),
            Arc::new(NoBtc(ExchangeId::new("b"))),
        ];
        let report = health_check(&config(&["BTC/USD", "ETH/USD"]), &sources);
        assert!(report.is_healthy());
        let check = report.checks().iter().find(|c| c.name() == "b.symbols").unwrap();
        assert_eq!(
            check.status(),
            &HealthStatus::Unhealthy("unsupported: BTC/USD".to_string())
        );
    }

    #[test]
    fn fully_unsupported_is_critical() {
        let sources: Vec<Arc<dyn QuoteSource>> = vec![
            Arc::new(ScriptedSource::new("a")),
            Arc::new(NoBtc(ExchangeId::new("b"))),
        ];
        let report = health_check(&config(&["BTC/USD"]), &sources);
        assert!(!report.is_healthy());
    }
}
