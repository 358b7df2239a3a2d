//! Cryptogap - cross-exchange crypto spot arbitrage detection.
//!
//! Polls best bid/ask for a set of trading pairs on two exchanges, keeps the
//! latest quotes in a shared cache, and each cycle reports the pairs whose
//! price gap stays profitable after both exchanges' taker fees, ranked by
//! fee-adjusted spread and annotated with a confidence score.
//!
//! # Architecture
//!
//! - [`domain`] - Symbols, quotes, fee schedule, spread calculation
//! - [`port`] - Capability traits: quote sources, scorer, explainer
//! - [`adapter`] - Binance and Kraken REST sources, heuristic scorer,
//!   template explainer, and the CLI
//! - [`application`] - Quote cache, detector cycle, opportunity feed
//! - [`infrastructure`] - Configuration, factories, polling loop
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use cryptogap::infrastructure::config::Config;
//! use cryptogap::infrastructure::factory::build_detector;
//!
//! # async fn demo() -> cryptogap::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let detector = build_detector(&config)?;
//! let report = detector.run_cycle().await;
//! for opportunity in &report.opportunities {
//!     println!("{} {}%", opportunity.candidate().symbol(),
//!         opportunity.candidate().fee_adjusted_spread_pct());
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
