//! Shared REST plumbing for exchange adapters.
//!
//! Every request waits on the adapter's rate limiter, is bounded by the
//! configured timeout and is retried with exponential backoff while the
//! failure is transient.

mod backoff;
mod transport;

pub use backoff::Backoff;
pub use transport::{ErrorClassifier, RestTransport};
