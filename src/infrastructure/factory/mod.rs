//! Factory modules for building infrastructure components.
//!
//! Construct fully-configured components from [`Config`](crate::infrastructure::config::Config).
//!
//! # Submodules
//!
//! - [`source`] - Exchange quote source construction
//! - [`detector`] - Detector wiring (sources, fees, scorer, explainer)

pub mod detector;
pub mod source;

pub use detector::{build_detector, build_detector_with};
pub use source::{build_fee_schedule, build_source, build_sources};
