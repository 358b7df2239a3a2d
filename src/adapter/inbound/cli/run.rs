//! Handler for the `run` command.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use super::command::DetectArgs;
use super::{output, report};
use crate::error::Result;
use crate::infrastructure::factory::build_detector;
use crate::infrastructure::orchestration::run_with_shutdown;

/// Poll until ctrl-c, printing every cycle's report.
pub async fn execute(args: &DetectArgs) -> Result<()> {
    let config = args.load()?;
    config.init_logging();

    let detector = Arc::new(build_detector(&config)?);
    print_startup(&config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    run_with_shutdown(detector, shutdown_rx, report::print).await;
    info!("cryptogap stopped");
    Ok(())
}

fn print_startup(config: &crate::infrastructure::config::Config) {
    output::header(env!("CARGO_PKG_VERSION"));
    let exchanges: Vec<String> = config
        .exchanges
        .iter()
        .map(|e| e.exchange_id().to_string())
        .collect();
    output::field("Exchanges", exchanges.join(" ↔ "));
    let symbols: Vec<&str> = config.symbols.iter().map(|s| s.as_str()).collect();
    output::field("Symbols", symbols.join(", "));
    output::field("Min profit", format!("{}%", config.detector.min_profit_pct));
    output::field("Interval", format!("{}s", config.detector.poll_interval_secs));
    output::field("Freshness", format!("{}s", config.detector.freshness_window_secs));
}
