//! Adapters implementing the ports.
//!
//! - [`inbound`]: the command-line surface driving the application
//! - [`outbound`]: exchange quote sources, scorer and explainer

pub mod inbound;
pub mod outbound;
