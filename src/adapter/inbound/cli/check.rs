//! Handler for the `check` command.

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::command::ConfigArg;
use super::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::factory::build_sources;
use crate::infrastructure::orchestration::{health_check, HealthStatus};

#[derive(Tabled, Serialize)]
struct MappingRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Exchange")]
    exchange: String,
    #[tabled(rename = "Native")]
    native: String,
}

/// Validate the configuration and show how each symbol maps per exchange.
pub fn execute(args: &ConfigArg) -> Result<()> {
    let config = args.load()?;
    let sources = build_sources(&config)?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Config", args.config.display());
    output::success("Configuration is valid");

    let rows: Vec<MappingRow> = config
        .symbols
        .iter()
        .flat_map(|symbol| {
            sources.iter().map(move |source| MappingRow {
                symbol: symbol.to_string(),
                exchange: source.exchange().to_string(),
                native: source
                    .native_symbol(symbol)
                    .unwrap_or_else(|| "unsupported".to_string()),
            })
        })
        .collect();

    if output::is_json() {
        output::emit("symbols", &rows);
    } else {
        output::section("Symbols");
        output::lines(&Table::new(&rows).with(Style::rounded()).to_string());
    }

    let report = health_check(&config, &sources);
    for check in report.checks() {
        match check.status() {
            HealthStatus::Healthy => output::success(check.name()),
            HealthStatus::Unhealthy(reason) => {
                output::warning(&format!("{}: {}", check.name(), reason));
            }
        }
    }

    if !report.is_healthy() {
        return Err(ConfigError::InvalidValue {
            field: "symbols",
            reason: "critical health check failed".to_string(),
        }
        .into());
    }
    Ok(())
}
