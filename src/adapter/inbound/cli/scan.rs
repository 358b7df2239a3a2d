//! Handler for the `scan` command.

use super::command::DetectArgs;
use super::{output, report};
use crate::error::Result;
use crate::infrastructure::factory::build_detector;

/// Run one detection cycle and print its report.
pub async fn execute(args: &DetectArgs) -> Result<()> {
    let config = args.load()?;
    config.init_logging();

    let detector = build_detector(&config)?;
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Symbols", config.symbols.len());
    output::field("Min profit", format!("{}%", config.detector.min_profit_pct));

    let report = detector.run_cycle().await;
    report::print(&report);
    Ok(())
}
