//! Runtime orchestration.
//!
//! The polling loop that drives sequential detection cycles, and the static
//! configuration health check used by `cryptogap check`.

pub mod health;
pub mod runtime;

pub use health::{health_check, HealthCheck, HealthReport, HealthStatus};
pub use runtime::run_with_shutdown;
