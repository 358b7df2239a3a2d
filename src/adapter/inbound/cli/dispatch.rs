//! Command dispatch.

use super::command::{Cli, Commands};
use super::{check, output, run, scan};
use crate::error::Result;

/// Dispatch a parsed command line.
///
/// # Errors
///
/// Propagates configuration and wiring errors from the selected command.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    match cli.command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Scan(args) => scan::execute(&args).await,
        Commands::Check(args) => check::execute(&args),
    }
}
