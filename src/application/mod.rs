//! Application services (use cases).
//!
//! These services drive the detection pipeline over the ports and own the
//! only shared mutable state, the quote cache.

pub mod cache;
pub mod detector;
pub mod feed;
pub mod report;

pub use detector::{Detector, DetectorConfig};
pub use feed::OpportunityFeed;
pub use report::{CycleOutcome, CycleReport, ExchangeHealth, ExchangeStatus, SkipReason};
