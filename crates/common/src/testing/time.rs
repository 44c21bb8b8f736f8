//! Time abstraction for testability
//!
//! Every wait performed by the retry engine goes through [`Clock`], so tests
//! can drive virtual time with [`MockClock`] and never block on real sleeps.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use converge_common::testing::{Clock, MockClock, SystemClock};
//!
//! // Use system clock in production
//! let clock = SystemClock;
//! let now = clock.now();
//!
//! // Use mock clock in tests
//! let mock = MockClock::new();
//! let start = mock.now();
//! mock.sleep(Duration::from_secs(5));
//! assert_eq!(mock.now().duration_since(start), Duration::from_secs(5));
//! assert_eq!(mock.sleep_count(), 1);
//! ```

#![allow(clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Trait for time operations to enable testing
///
/// Implementations must be shareable across threads: a single clock may be
/// used by reconciliations running for different resources in parallel.
pub trait Clock: Send + Sync {
    /// Get current instant (monotonic time)
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`
    ///
    /// Mock implementations advance virtual time instead of blocking.
    fn sleep(&self, duration: Duration);
}

/// Real system clock implementation
///
/// Uses the monotonic system clock and `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Mock clock for deterministic testing
///
/// Time only moves when [`MockClock::advance`] or [`Clock::sleep`] is
/// called. Every sleep is recorded so tests can assert on the exact backoff
/// schedule. Clones share state.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use converge_common::testing::{Clock, MockClock};
///
/// let clock = MockClock::new();
/// clock.sleep(Duration::from_millis(250));
/// clock.sleep(Duration::from_millis(500));
///
/// assert_eq!(clock.elapsed(), Duration::from_millis(750));
/// assert_eq!(
///     clock.recorded_sleeps(),
///     vec![Duration::from_millis(250), Duration::from_millis(500)]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl MockClock {
    /// Create a new mock clock anchored at the current real time
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
            sleeps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Advance the mock clock by a duration without recording a sleep
    ///
    /// Useful for simulating time spent inside a remote call.
    pub fn advance(&self, duration: Duration) {
        // Test utility: panic on poisoned mutex to fail tests early
        let mut elapsed = self.elapsed.lock().expect("mutex poisoned");
        *elapsed += duration;
    }

    /// Virtual time elapsed since the clock was created
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().expect("mutex poisoned")
    }

    /// Number of sleeps performed through this clock
    #[must_use]
    pub fn sleep_count(&self) -> usize {
        self.sleeps.lock().expect("mutex poisoned").len()
    }

    /// Every sleep duration, in call order
    #[must_use]
    pub fn recorded_sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().expect("mutex poisoned").clone()
    }

    /// Sum of all recorded sleeps
    #[must_use]
    pub fn total_slept(&self) -> Duration {
        self.sleeps.lock().expect("mutex poisoned").iter().sum()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock().expect("mutex poisoned")
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().expect("mutex poisoned").push(duration);
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for testing::time.
    use super::*;

    /// Validates the system clock scenario.
    ///
    /// Assertions:
    /// - Ensures `now2 >= now1` evaluates to true.
    /// - Ensures a zero-length sleep returns immediately.
    #[test]
    fn test_system_clock() {
        let clock = SystemClock;
        let now1 = clock.now();
        clock.sleep(Duration::ZERO);
        let now2 = clock.now();

        assert!(now2 >= now1);
    }

    /// Validates `MockClock::advance` moves time without recording sleeps.
    ///
    /// Assertions:
    /// - Confirms `after.duration_since(start)` equals `5s`.
    /// - Confirms `sleep_count()` stays at zero.
    #[test]
    fn test_mock_clock_advance() {
        let clock = MockClock::new();
        let start = clock.now();

        clock.advance(Duration::from_secs(5));

        assert_eq!(clock.now().duration_since(start), Duration::from_secs(5));
        assert_eq!(clock.sleep_count(), 0);
    }

    /// Validates `MockClock::sleep` records durations in order.
    ///
    /// Assertions:
    /// - Confirms recorded sleeps match the call order.
    /// - Confirms `total_slept()` and `elapsed()` both equal the sum.
    #[test]
    fn test_mock_clock_records_sleeps() {
        let clock = MockClock::new();

        clock.sleep(Duration::from_millis(100));
        clock.sleep(Duration::from_millis(200));
        clock.sleep(Duration::from_millis(400));

        assert_eq!(
            clock.recorded_sleeps(),
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400)
            ]
        );
        assert_eq!(clock.total_slept(), Duration::from_millis(700));
        assert_eq!(clock.elapsed(), Duration::from_millis(700));
    }

    /// Validates `MockClock` clones share state.
    ///
    /// Assertions:
    /// - Confirms a sleep on one clone is visible through the other.
    #[test]
    fn test_mock_clock_clone_shares_state() {
        let clock1 = MockClock::new();
        let clock2 = clock1.clone();

        clock1.sleep(Duration::from_secs(3));

        assert_eq!(clock2.elapsed(), Duration::from_secs(3));
        assert_eq!(clock2.sleep_count(), 1);
    }

    /// Validates `Clock` is implemented for `Arc<T>`.
    ///
    /// Assertions:
    /// - Confirms sleeping through the `Arc` advances the inner clock.
    #[test]
    fn test_arc_clock_delegates() {
        let inner = MockClock::new();
        let shared: Arc<MockClock> = Arc::new(inner.clone());

        shared.sleep(Duration::from_secs(2));

        assert_eq!(inner.elapsed(), Duration::from_secs(2));
        assert_eq!(shared.now(), inner.now());
    }
}
