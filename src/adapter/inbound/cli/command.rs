//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::domain::Symbol;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Cross-exchange crypto spot arbitrage detector
#[derive(Parser, Debug)]
#[command(name = "cryptogap")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll both exchanges continuously and print ranked opportunities
    Run(DetectArgs),

    /// Run a single detection cycle and exit
    Scan(DetectArgs),

    /// Validate configuration and show native symbol mapping
    Check(ConfigArg),
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArg {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Override tracked symbols (comma-separated, e.g. BTC/USD,ETH/USD)
    #[arg(long, value_delimiter = ',')]
    pub symbols: Option<Vec<Symbol>>,

    /// Override the minimum fee-adjusted spread in percent
    #[arg(long)]
    pub min_profit: Option<Decimal>,

    /// Override the poll interval in seconds
    #[arg(long)]
    pub interval: Option<u64>,
}

impl ConfigArg {
    /// Load and validate the configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the file is unreadable or invalid.
    pub fn load(&self) -> Result<Config> {
        Config::load(&self.config)
    }
}

impl DetectArgs {
    /// Load the configuration file and apply command-line overrides.
    ///
    /// # Errors
    ///
    /// Fails if the file is unreadable or the result is invalid.
    pub fn load(&self) -> Result<Config> {
        let mut config = self.config.load()?;
        if let Some(symbols) = &self.symbols {
            config.symbols = symbols.clone();
        }
        if let Some(min_profit) = self.min_profit {
            config.detector.min_profit_pct = min_profit;
        }
        if let Some(interval) = self.interval {
            config.detector.poll_interval_secs = interval;
        }
        config.validate()?;
        Ok(config)
    }
}
