//! Exchange-agnostic domain types and spread arithmetic.
//!
//! Everything here is pure: no I/O, no clocks except timestamps carried on
//! the values themselves.

pub mod error;
pub mod fee;
pub mod id;
pub mod opportunity;
pub mod quote;
pub mod spread;

pub use error::DomainError;
pub use fee::FeeSchedule;
pub use id::{ExchangeId, Symbol};
pub use opportunity::{Direction, MarketFeatures, OpportunityCandidate, ScoredOpportunity};
pub use quote::{Price, Quote, Volume};
pub use spread::SpreadCalculator;
