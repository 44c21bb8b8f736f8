//! Integration tests for resilience module
//!
//! Exercises the blocking retry loop against the real system clock and
//! across threads.

#![cfg(feature = "runtime")]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use converge_common::resilience::{Attempt, BackoffRetrier, OperationBudget, RetryError};
use converge_common::testing::{Clock, MockClock, SystemClock};

/// Custom error type for testing
#[derive(Debug, Clone, PartialEq)]
struct TestError {
    message: String,
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TestError {}

/// Validates the retry loop really sleeps with the system clock.
///
/// # Test Steps
/// 1. Configure a 2 second budget with a 10ms fixed delay
/// 2. Fail twice with a retryable error, then succeed
/// 3. Verify three attempts and at least 20ms of wall-clock time
#[test]
fn test_system_clock_retry_sleeps_between_attempts() {
    let retrier = BackoffRetrier::new().named("system-clock-retry");
    let budget = OperationBudget::fixed(Duration::from_secs(2), Duration::from_millis(10));
    let attempts = AtomicU32::new(0);
    let started = Instant::now();

    let result = retrier.retry(&budget, || {
        let n = attempts.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
            Err(Attempt::retry(TestError { message: "pending".into() }))
        } else {
            Ok("done")
        }
    });

    assert_eq!(result.expect("retry should succeed"), "done");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert!(started.elapsed() >= Duration::from_millis(20));
}

/// Validates a fatal error is propagated with its `std::error::Error`
/// source chain intact.
///
/// # Test Steps
/// 1. Return a fatal `TestError` on the first attempt
/// 2. Verify the error source downcasts to `TestError`
#[test]
fn test_fatal_error_exposes_source() {
    let retrier = BackoffRetrier::with_clock(MockClock::new());
    let budget = OperationBudget::new(Duration::from_secs(30));

    let err = retrier
        .retry::<(), _, _>(&budget, || {
            Err(Attempt::fatal(TestError { message: "AuthFailure.SignatureFailure".into() }))
        })
        .expect_err("fatal attempt must fail");

    let source = std::error::Error::source(&err).expect("fatal errors carry a source");
    assert_eq!(source.to_string(), "AuthFailure.SignatureFailure");
    assert!(matches!(err, RetryError::Fatal { attempts: 1, .. }));
}

/// Validates independent reconciliations may share one clock across threads.
///
/// # Test Steps
/// 1. Share an `Arc<MockClock>` between four scoped threads
/// 2. Each thread retries twice before succeeding
/// 3. Verify every thread succeeded and eight sleeps were recorded
#[test]
fn test_shared_clock_across_threads() {
    let clock = Arc::new(MockClock::new());
    let budget = OperationBudget::fixed(Duration::from_secs(60), Duration::from_secs(1));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|resource| {
                let retrier = BackoffRetrier::with_clock(Arc::clone(&clock));
                let budget = budget.clone();
                scope.spawn(move || {
                    let mut polls = 0;
                    retrier.retry(&budget, || {
                        polls += 1;
                        if polls < 3 {
                            Err(Attempt::retry(TestError { message: format!("r{resource}") }))
                        } else {
                            Ok(resource)
                        }
                    })
                })
            })
            .collect();

        for (expected, handle) in handles.into_iter().enumerate() {
            let value = handle.join().expect("thread panicked").expect("retry failed");
            assert_eq!(value, expected);
        }
    });

    assert_eq!(clock.sleep_count(), 8);
}

/// Validates `SystemClock` satisfies the `Clock` contract used by retriers.
///
/// # Test Steps
/// 1. Sleep 5ms through the clock
/// 2. Verify at least 5ms of monotonic time passed
#[test]
fn test_system_clock_sleep() {
    let clock = SystemClock;
    let before = clock.now();
    clock.sleep(Duration::from_millis(5));
    assert!(clock.now().duration_since(before) >= Duration::from_millis(5));
}
