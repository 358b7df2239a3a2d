//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`]: [`ScriptedSource`](source::ScriptedSource), a
//!   [`QuoteSource`](crate::port::QuoteSource) whose replies tests control.
//! - [`scoring`]: stub scorers and explainers (fixed, failing, slow).
//! - [`domain`]: builders for symbols and quotes.
//! - [`config`]: canonical test configurations.

pub mod config;
pub mod domain;
pub mod scoring;
pub mod source;
