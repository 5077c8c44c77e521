//! Wall-clock abstraction for time-sliced key derivation.

use crate::error::AuthError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current Unix time in whole seconds.
///
/// The signer reads the clock exactly once per signing call. Injecting a
/// [`FixedClock`] makes slice-boundary and timestamp-formatting behavior
/// testable without waiting for real time to pass.
pub trait Clock: Send + Sync {
    /// Current Unix time in seconds.
    ///
    /// # Errors
    /// Returns `AuthError::ClockUnavailable` if the host clock cannot be read.
    fn unix_seconds(&self) -> Result<u64, AuthError>;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> Result<u64, AuthError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|_| AuthError::ClockUnavailable)
    }
}

/// Clock pinned to a settable instant, for deterministic tests.
#[derive(Debug)]
pub struct FixedClock {
    seconds: AtomicU64,
}

impl FixedClock {
    /// Create a clock pinned at the given Unix time.
    pub fn new(seconds: u64) -> Self {
        Self {
            seconds: AtomicU64::new(seconds),
        }
    }

    /// Move the clock to a new Unix time.
    pub fn set(&self, seconds: u64) {
        self.seconds.store(seconds, Ordering::Relaxed);
    }
}

impl Clock for FixedClock {
    fn unix_seconds(&self) -> Result<u64, AuthError> {
        Ok(self.seconds.load(Ordering::Relaxed))
    }
}
