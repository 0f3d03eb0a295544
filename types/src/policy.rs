use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry tuning for wrapped fallible operations.
///
/// The defaults reproduce a fixed inter-attempt delay: a `backoff` of 1.0
/// keeps every delay equal to `delay`, and zero `jitter` keeps the schedule
/// deterministic. Raising `backoff` turns on exponential growth capped at
/// `max_delay`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Additional attempts after the first; total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Delay before the first re-attempt.
    pub delay: Duration,
    /// Multiplier applied to the delay after each failed attempt. Values
    /// below 1.0 are treated as 1.0.
    pub backoff: f64,
    /// Upper bound on the inter-attempt delay once `backoff` grows it.
    pub max_delay: Duration,
    /// Down-jitter factor in `[0, 1)`: each delay is scaled by a random
    /// factor in `[1 - jitter, 1]`.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_millis(500),
            backoff: 1.0,
            max_delay: Duration::from_secs(8),
            jitter: 0.0,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: f64) -> Self {
        self.backoff = backoff.max(1.0);
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 0.99);
        self
    }

    /// Total number of attempts this policy allows.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}
