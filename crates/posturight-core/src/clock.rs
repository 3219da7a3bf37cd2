//! Monotonic time sources for rep debouncing.
//!
//! Frame rate is not constant, so the debounce floor is measured in elapsed
//! time rather than frames. Readings are offsets from the clock's origin.

use std::time::{Duration, Instant};

/// A monotonic time source.
pub trait Clock {
    /// Time elapsed since the clock's origin. Never decreases.
    fn now(&self) -> Duration;
}

/// Wall-clock time measured with [`Instant`] from the moment of creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Starts a clock at the current instant.
    #[must_use]
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock advanced explicitly by the caller.
///
/// Used when replaying recorded frames with their capture timestamps. Setting
/// a time earlier than the current reading is ignored to keep it monotonic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    /// Creates a clock reading zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Moves the clock to `at`, if that is not in the past.
    pub fn set(&mut self, at: Duration) {
        if at > self.now {
            self.now = at;
        }
    }

    /// Moves the clock to `secs` seconds after the origin.
    ///
    /// Negative or non-finite values are ignored.
    pub fn set_secs(&mut self, secs: f64) {
        if let Ok(at) = Duration::try_from_secs_f64(secs) {
            self.set(at);
        }
    }

    /// Advances the clock by `delta`, saturating at `Duration::MAX`.
    pub fn advance(&mut self, delta: Duration) {
        self.now = self.now.saturating_add(delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }
}
