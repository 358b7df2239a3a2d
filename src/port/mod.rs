//! Capability traits at the edges of the detection core.
//!
//! - [`QuoteSource`]: exchange adapters producing normalized quotes
//! - [`Scorer`]: confidence model, features in, score out
//! - [`Explainer`]: human-readable rationale for a scored opportunity

pub mod exchange;
pub mod explainer;
pub mod scorer;

pub use exchange::{FetchBatch, QuoteSource};
pub use explainer::Explainer;
pub use scorer::{MarketFeatures, Scorer};
