//! Opportunity detection.
//!
//! [`Detector`] owns the two quote sources and runs the cycle state machine
//! described by [`CyclePhase`]. Stages are split by concern:
//!
//! - [`ranking`]: pair fresh quotes, apply liquidity filter, sort
//! - [`enrich`]: score and explain with timeouts and neutral fallbacks

pub mod config;
pub mod enrich;
pub mod phase;
pub mod ranking;
mod service;

pub use config::DetectorConfig;
pub use enrich::Enricher;
pub use phase::CyclePhase;
pub use service::{Detection, Detector, DetectorBuilder};
