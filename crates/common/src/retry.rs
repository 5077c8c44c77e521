//! Retry pacing for transport-level failures.
//!
//! Signed headers go stale once the rotation period elapses, so callers
//! must re-sign on every attempt; only the pacing lives here.

use rand::Rng;
use std::time::Duration;

/// Exponential retry schedule with jitter.
///
/// Delay formula: min(max_delay, base * 2^attempt) + random_jitter
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base: Duration,
    max_delay: Duration,
    jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            jitter_factor: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Create a new RetryPolicy.
    ///
    /// # Arguments
    /// * `max_attempts` - Total attempts before giving up
    /// * `base` - Delay after the first failure
    /// * `max_delay` - Delay cap
    /// * `jitter_factor` - Jitter as a fraction of the delay (0.0 to 1.0).
    ///   Negative values are clamped to 0.
    pub fn new(max_attempts: u32, base: Duration, max_delay: Duration, jitter_factor: f64) -> Self {
        Self {
            max_attempts,
            base,
            max_delay,
            jitter_factor: jitter_factor.max(0.0),
        }
    }

    /// Total attempts before giving up.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after the given zero-based failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp_delay = self.base.saturating_mul(2u32.saturating_pow(attempt));
        let capped_delay = exp_delay.min(self.max_delay);

        let jitter_range = capped_delay.as_secs_f64() * self.jitter_factor;
        let jitter = if jitter_range > 0.0 {
            rand::thread_rng().gen_range(0.0..=jitter_range)
        } else {
            0.0
        };

        Duration::from_secs_f64(capped_delay.as_secs_f64() + jitter)
    }
}
