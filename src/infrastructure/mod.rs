//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic: configuration, component wiring and the runtime loop.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`factory`] - Component factory functions
//! - [`orchestration`] - Polling loop and configuration health checks

pub mod config;
pub mod factory;
pub mod orchestration;
