//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

use crate::infrastructure::config::exchange::BackoffConfig;

/// Backoff state for one retry sequence.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: BackoffConfig,
    /// Current backoff delay in milliseconds.
    current_delay_ms: u64,
    /// Delays handed out so far.
    attempts: u32,
}

impl Backoff {
    pub fn new(config: BackoffConfig) -> Self {
        let initial = config.initial_delay_ms;
        Self {
            config,
            current_delay_ms: initial,
            attempts: 0,
        }
    }

    /// Number of delays handed out so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Return the current delay plus jitter and advance the internal delay.
    pub fn next_delay(&mut self) -> Duration {
        let base = self.current_delay_ms;
        let delay = Duration::from_millis(base + jitter_ms(base));

        let next = (base as f64 * self.config.multiplier) as u64;
        self.current_delay_ms = next.min(self.config.max_delay_ms);
        self.attempts += 1;

        delay
    }
}

/// Up to 20% random jitter to avoid synchronized retries.
fn jitter_ms(base_ms: u64) -> u64 {
    let range = base_ms / 5;
    if range == 0 {
        return 0;
    }
    rand::thread_rng().gen_range(0..=range)
}
