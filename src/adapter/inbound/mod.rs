//! Inbound adapters.

pub mod cli;
