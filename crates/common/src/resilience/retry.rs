//! Blocking retry loop bounded by a wall-clock budget
//!
//! [`BackoffRetrier`] runs an attempt function until it succeeds, fails
//! fatally, or the [`OperationBudget`] runs out. Attempts report their
//! outcome as `Result<T, Attempt<E>>`, so the caller decides per failure
//! whether another attempt makes sense.
//!
//! The loop blocks the calling thread between attempts. All waiting goes
//! through a [`Clock`], so tests drive it with
//! [`MockClock`](crate::testing::MockClock) and never sleep for real.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use converge_common::resilience::{Attempt, BackoffRetrier, OperationBudget};
//! use converge_common::testing::MockClock;
//!
//! let retrier = BackoffRetrier::with_clock(MockClock::new());
//! let budget = OperationBudget::fixed(Duration::from_secs(10), Duration::from_secs(1));
//!
//! let mut polls = 0;
//! let value = retrier
//!     .retry(&budget, || {
//!         polls += 1;
//!         if polls < 3 { Err(Attempt::retry("not yet")) } else { Ok(polls) }
//!     })
//!     .unwrap();
//! assert_eq!(value, 3);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use super::constants::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_DELAY, DEFAULT_OPERATION_NAME, DEFAULT_POLL_INTERVAL,
    MAX_BACKOFF_EXPONENT,
};
use super::metrics::RetryReport;
use super::rate_limiter::OperationRateLimiter;
use super::tracing::RetryTracer;
use crate::testing::time::{Clock, SystemClock};

/// Delay applied between two consecutive attempts
#[derive(Debug, Clone, PartialEq)]
pub enum DelayPolicy {
    /// Same delay before every retry
    Fixed(Duration),
    /// `initial * factor^n`, never longer than `max`
    CappedExponential {
        /// Delay after the first failure
        initial: Duration,
        /// Growth per further failure
        factor: f64,
        /// Longest delay ever applied
        max: Duration,
    },
}

impl DelayPolicy {
    /// Capped-exponential policy with the default factor and cap
    pub fn exponential(initial: Duration) -> Self {
        Self::CappedExponential {
            initial,
            factor: DEFAULT_BACKOFF_FACTOR,
            max: DEFAULT_MAX_DELAY,
        }
    }

    /// Delay to wait after the `retry_index`-th retryable failure
    /// (zero-based).
    pub fn delay_for(&self, retry_index: u32) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::CappedExponential { initial, factor, max } => {
                let exponent = retry_index.min(MAX_BACKOFF_EXPONENT) as i32;
                let secs = initial.as_secs_f64() * factor.powi(exponent);
                if !secs.is_finite() || secs < 0.0 {
                    return *max;
                }
                Duration::try_from_secs_f64(secs).map_or(*max, |delay| delay.min(*max))
            }
        }
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self::Fixed(DEFAULT_POLL_INTERVAL)
    }
}

/// Immutable retry budget for one call site
///
/// Holds how long to keep retrying and how long to wait between attempts.
/// A zero budget still allows exactly one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationBudget {
    max_duration: Duration,
    delay: DelayPolicy,
    awaiting: Option<String>,
}

impl OperationBudget {
    /// Budget with the default constant poll interval
    pub fn new(max_duration: Duration) -> Self {
        Self { max_duration, delay: DelayPolicy::default(), awaiting: None }
    }

    /// Budget with a constant delay between attempts
    pub fn fixed(max_duration: Duration, delay: Duration) -> Self {
        Self { max_duration, delay: DelayPolicy::Fixed(delay), awaiting: None }
    }

    /// Budget with a capped-exponential delay
    pub fn capped_exponential(
        max_duration: Duration,
        initial: Duration,
        factor: f64,
        max_delay: Duration,
    ) -> Self {
        Self {
            max_duration,
            delay: DelayPolicy::CappedExponential { initial, factor, max: max_delay },
            awaiting: None,
        }
    }

    /// Budget from a signed millisecond count; negative values clamp to zero
    pub fn from_signed_millis(millis: i64, delay: DelayPolicy) -> Self {
        let max_duration = u64::try_from(millis).map(Duration::from_millis).unwrap_or_default();
        Self { max_duration, delay, awaiting: None }
    }

    /// Attach the condition being awaited, used in timeout messages
    #[must_use]
    pub fn with_awaiting(mut self, awaiting: impl Into<String>) -> Self {
        self.awaiting = Some(awaiting.into());
        self
    }

    /// Copy of this budget with `awaiting` set only if it was unset
    #[must_use]
    pub fn or_awaiting(&self, awaiting: impl Into<String>) -> Self {
        let mut budget = self.clone();
        if budget.awaiting.is_none() {
            budget.awaiting = Some(awaiting.into());
        }
        budget
    }

    /// Maximum wall-clock time to keep retrying
    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// Delay policy between attempts
    pub fn delay_policy(&self) -> &DelayPolicy {
        &self.delay
    }

    /// Condition being awaited, if the caller named one
    pub fn awaiting(&self) -> Option<&str> {
        self.awaiting.as_deref()
    }

    /// Same budget scaled by `factor`, saturating on overflow
    #[must_use]
    pub fn scaled(&self, factor: u32) -> Self {
        Self { max_duration: self.max_duration.saturating_mul(factor), ..self.clone() }
    }
}

/// Outcome of a single failed attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<E> {
    /// Failure that may clear up; try again if budget remains
    Retry(E),
    /// Failure that will not clear up; stop immediately
    Fatal(E),
}

impl<E> Attempt<E> {
    /// Mark an error as retryable
    pub fn retry(error: E) -> Self {
        Self::Retry(error)
    }

    /// Mark an error as fatal
    pub fn fatal(error: E) -> Self {
        Self::Fatal(error)
    }

    /// True when another attempt may succeed
    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry(_))
    }

    /// Unwrap the underlying error regardless of classification
    pub fn into_inner(self) -> E {
        match self {
            Self::Retry(e) | Self::Fatal(e) => e,
        }
    }

    /// Map the error while keeping the classification
    pub fn map<F, U>(self, f: F) -> Attempt<U>
    where
        F: FnOnce(E) -> U,
    {
        match self {
            Self::Retry(e) => Attempt::Retry(f(e)),
            Self::Fatal(e) => Attempt::Fatal(f(e)),
        }
    }
}

/// Errors returned by [`BackoffRetrier`]
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// An attempt failed fatally
    #[error("{source}")]
    Fatal {
        /// Error returned by the failing attempt
        source: E,
        /// Attempts made, including the fatal one
        attempts: u32,
    },

    /// The budget ran out while the operation was still retryable
    #[error("timed out after {elapsed:?} {awaiting} ({attempts} attempts, last error: {last})")]
    Timeout {
        /// Condition that was still pending
        awaiting: String,
        /// Time spent before giving up
        elapsed: Duration,
        /// Attempts made
        attempts: u32,
        /// Last retryable error
        last: E,
    },
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Fatal { attempts, .. } | Self::Timeout { attempts, .. } => *attempts,
        }
    }

    /// True when the budget ran out rather than an attempt failing fatally
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// The fatal error or the last retryable one
    pub fn into_inner(self) -> E {
        match self {
            Self::Fatal { source, .. } => source,
            Self::Timeout { last, .. } => last,
        }
    }
}

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Blocking retrier bound to a clock and an optional outer deadline
///
/// Holds no per-call state, so one retrier can serve many calls, including
/// calls made from different threads. An attached rate limiter is shared by
/// every clone.
#[derive(Debug, Clone)]
pub struct BackoffRetrier<C: Clock = SystemClock> {
    clock: C,
    deadline: Option<Instant>,
    operation: Cow<'static, str>,
    rate_limiter: Option<Arc<OperationRateLimiter>>,
}

impl BackoffRetrier<SystemClock> {
    /// Retrier backed by the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for BackoffRetrier<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> BackoffRetrier<C> {
    /// Retrier backed by a custom clock
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            deadline: None,
            operation: Cow::Borrowed(DEFAULT_OPERATION_NAME),
            rate_limiter: None,
        }
    }

    /// Bound every loop by an outer deadline in addition to its budget
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Name used for the `operation` field in logs
    #[must_use]
    pub fn named(mut self, operation: impl Into<Cow<'static, str>>) -> Self {
        self.operation = operation.into();
        self
    }

    /// Take one permit from `limiter` before every attempt
    ///
    /// Permits are keyed by the operation name set with
    /// [`named`](Self::named).
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: Arc<OperationRateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Clock used for every wait
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Outer deadline, if one was set
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Operation name used in logs and as the rate-limit key
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Rate limiter consulted before each attempt, if any
    pub fn rate_limiter(&self) -> Option<&Arc<OperationRateLimiter>> {
        self.rate_limiter.as_ref()
    }

    /// Run `attempt_fn` until success, fatal failure, or budget exhaustion
    pub fn retry<T, E, F>(&self, budget: &OperationBudget, attempt_fn: F) -> RetryResult<T, E>
    where
        E: fmt::Display,
        F: FnMut() -> Result<T, Attempt<E>>,
    {
        self.retry_with_report(budget, attempt_fn).0
    }

    /// Like [`retry`](Self::retry), also returning loop statistics
    pub fn retry_with_report<T, E, F>(
        &self,
        budget: &OperationBudget,
        mut attempt_fn: F,
    ) -> (RetryResult<T, E>, RetryReport)
    where
        E: fmt::Display,
        F: FnMut() -> Result<T, Attempt<E>>,
    {
        let span = RetryTracer::new().start_retry_span(&self.operation, budget.max_duration());
        let start = self.clock.now();
        let deadline = self.effective_deadline(start, budget.max_duration());
        let mut report = RetryReport::new();

        loop {
            report.attempts += 1;
            let attempt = report.attempts;
            span.record_attempt(attempt);

            if let Some(limiter) = &self.rate_limiter {
                let waited = limiter.acquire(&self.operation, &self.clock);
                if !waited.is_zero() {
                    span.record_throttle(attempt, waited);
                    report.throttled += waited;
                }
            }

            let error = match attempt_fn() {
                Ok(value) => {
                    report.succeeded = true;
                    span.record_success(attempt, self.clock.now().saturating_duration_since(start));
                    return (Ok(value), report);
                }
                Err(Attempt::Fatal(source)) => {
                    span.record_fatal(attempt, &source.to_string());
                    return (Err(RetryError::Fatal { source, attempts: attempt }), report);
                }
                Err(Attempt::Retry(error)) => error,
            };

            let now = self.clock.now();
            let elapsed = now.saturating_duration_since(start);
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(now),
                None => Duration::MAX,
            };

            if remaining.is_zero() {
                report.timed_out = true;
                let awaiting = budget.awaiting().unwrap_or(&self.operation).to_string();
                span.record_timeout(attempt, elapsed, &awaiting);
                return (
                    Err(RetryError::Timeout { awaiting, elapsed, attempts: attempt, last: error }),
                    report,
                );
            }

            let delay = budget.delay_policy().delay_for(attempt - 1).min(remaining);
            span.record_backoff(attempt, delay, elapsed, &error.to_string());
            self.clock.sleep(delay);
            report.sleeps += 1;
            report.total_delay += delay;
        }
    }

    /// Earlier of the budget deadline and the outer deadline; `None` when
    /// neither is representable
    fn effective_deadline(&self, start: Instant, budget: Duration) -> Option<Instant> {
        match (start.checked_add(budget), self.deadline) {
            (Some(own), Some(outer)) => Some(own.min(outer)),
            (own, outer) => own.or(outer),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for resilience::retry.
    use super::*;
    use crate::resilience::TokenBucketConfig;
    use crate::testing::MockClock;

    fn mock_retrier() -> (BackoffRetrier<MockClock>, MockClock) {
        let clock = MockClock::new();
        (BackoffRetrier::with_clock(clock.clone()), clock)
    }

    /// Validates `DelayPolicy::delay_for` for fixed and capped policies.
    ///
    /// Assertions:
    /// - Confirms a fixed policy returns the same delay for every index.
    /// - Confirms the exponential policy doubles and then hits its cap.
    #[test]
    fn test_delay_policy_schedule() {
        let fixed = DelayPolicy::Fixed(Duration::from_secs(2));
        assert_eq!(fixed.delay_for(0), Duration::from_secs(2));
        assert_eq!(fixed.delay_for(9), Duration::from_secs(2));

        let capped = DelayPolicy::CappedExponential {
            initial: Duration::from_secs(1),
            factor: 2.0,
            max: Duration::from_secs(5),
        };
        assert_eq!(capped.delay_for(0), Duration::from_secs(1));
        assert_eq!(capped.delay_for(1), Duration::from_secs(2));
        assert_eq!(capped.delay_for(2), Duration::from_secs(4));
        assert_eq!(capped.delay_for(3), Duration::from_secs(5));
        assert_eq!(capped.delay_for(u32::MAX), Duration::from_secs(5));
    }

    /// Validates `OperationBudget::from_signed_millis` clamping.
    ///
    /// Assertions:
    /// - Confirms negative budgets clamp to zero.
    /// - Confirms positive budgets convert exactly.
    #[test]
    fn test_budget_from_signed_millis() {
        let negative = OperationBudget::from_signed_millis(-500, DelayPolicy::default());
        assert_eq!(negative.max_duration(), Duration::ZERO);

        let positive = OperationBudget::from_signed_millis(1500, DelayPolicy::default());
        assert_eq!(positive.max_duration(), Duration::from_millis(1500));
    }

    /// Validates `OperationBudget::or_awaiting` only fills an unset
    /// description.
    ///
    /// Assertions:
    /// - Confirms a caller-supplied description is preserved.
    /// - Confirms a missing description is filled in.
    #[test]
    fn test_budget_or_awaiting() {
        let named = OperationBudget::new(Duration::from_secs(1)).with_awaiting("waiting for A");
        assert_eq!(named.or_awaiting("waiting for B").awaiting(), Some("waiting for A"));

        let unnamed = OperationBudget::new(Duration::from_secs(1));
        assert_eq!(unnamed.or_awaiting("waiting for B").awaiting(), Some("waiting for B"));
    }

    /// Validates `OperationBudget::scaled` multiplies the duration.
    ///
    /// Assertions:
    /// - Confirms the duration is multiplied and the delay policy kept.
    #[test]
    fn test_budget_scaled() {
        let budget = OperationBudget::fixed(Duration::from_secs(3), Duration::from_secs(1));
        let scaled = budget.scaled(20);
        assert_eq!(scaled.max_duration(), Duration::from_secs(60));
        assert_eq!(scaled.delay_policy(), &DelayPolicy::Fixed(Duration::from_secs(1)));
    }

    /// Validates zero and negative budgets attempt exactly once.
    ///
    /// Assertions:
    /// - Confirms the attempt function runs once per budget.
    /// - Ensures the result is a `Timeout` carrying the last error.
    /// - Confirms no sleep happened.
    #[test]
    fn test_non_positive_budget_attempts_once() {
        for millis in [0_i64, -1, -60_000] {
            let (retrier, clock) = mock_retrier();
            let budget = OperationBudget::from_signed_millis(millis, DelayPolicy::default());
            let mut calls = 0;

            let result: RetryResult<(), &str> = retrier.retry(&budget, || {
                calls += 1;
                Err(Attempt::retry("pending"))
            });

            assert_eq!(calls, 1);
            match result {
                Err(RetryError::Timeout { last, attempts, .. }) => {
                    assert_eq!(last, "pending");
                    assert_eq!(attempts, 1);
                }
                other => panic!("expected timeout, got {other:?}"),
            }
            assert_eq!(clock.sleep_count(), 0);
        }
    }

    /// Validates a zero budget still returns a first-attempt success.
    ///
    /// Assertions:
    /// - Confirms the value is returned.
    #[test]
    fn test_zero_budget_success() {
        let (retrier, _) = mock_retrier();
        let budget = OperationBudget::new(Duration::ZERO);
        let result: RetryResult<u8, &str> = retrier.retry(&budget, || Ok(7));
        assert_eq!(result.unwrap(), 7);
    }

    /// Validates the retry loop sleeps once per retryable failure.
    ///
    /// Assertions:
    /// - Confirms `n` failures then success yield `n + 1` attempts and `n`
    ///   sleeps of the fixed delay.
    #[test]
    fn test_retry_until_success() {
        let (retrier, clock) = mock_retrier();
        let budget = OperationBudget::fixed(Duration::from_secs(60), Duration::from_secs(2));
        let mut calls = 0;

        let (result, report) = retrier.retry_with_report(&budget, || {
            calls += 1;
            if calls <= 4 {
                Err(Attempt::retry("pending"))
            } else {
                Ok(calls)
            }
        });

        assert_eq!(result.unwrap(), 5);
        assert_eq!(report.attempts, 5);
        assert_eq!(report.sleeps, 4);
        assert!(report.succeeded);
        assert_eq!(clock.recorded_sleeps(), vec![Duration::from_secs(2); 4]);
    }

    /// Validates a fatal failure stops the loop immediately.
    ///
    /// Assertions:
    /// - Confirms the fatal error is returned unchanged.
    /// - Confirms no sleep follows the fatal attempt.
    #[test]
    fn test_fatal_stops_immediately() {
        let (retrier, clock) = mock_retrier();
        let budget = OperationBudget::fixed(Duration::from_secs(60), Duration::from_secs(1));
        let mut calls = 0;

        let result: RetryResult<(), String> = retrier.retry(&budget, || {
            calls += 1;
            if calls == 1 {
                Err(Attempt::retry("pending".to_string()))
            } else {
                Err(Attempt::fatal("AuthFailure: denied".to_string()))
            }
        });

        match result {
            Err(RetryError::Fatal { source, attempts }) => {
                assert_eq!(source, "AuthFailure: denied");
                assert_eq!(attempts, 2);
            }
            other => panic!("expected fatal, got {other:?}"),
        }
        assert_eq!(clock.sleep_count(), 1);
    }

    /// Validates budget exhaustion and sleep truncation.
    ///
    /// Assertions:
    /// - Confirms the last sleep is truncated to the remaining budget.
    /// - Confirms one final attempt runs exactly at the deadline.
    /// - Ensures the timeout message names the awaited condition.
    #[test]
    fn test_timeout_truncates_last_sleep() {
        let (retrier, clock) = mock_retrier();
        let budget = OperationBudget::fixed(Duration::from_secs(5), Duration::from_secs(2))
            .with_awaiting("waiting for task T1");
        let mut calls = 0;

        let result: RetryResult<(), &str> = retrier.retry(&budget, || {
            calls += 1;
            Err(Attempt::retry("running"))
        });

        assert_eq!(
            clock.recorded_sleeps(),
            vec![Duration::from_secs(2), Duration::from_secs(2), Duration::from_secs(1)]
        );
        assert_eq!(calls, 4);
        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.attempts(), 4);
        let message = err.to_string();
        assert!(message.contains("waiting for task T1"), "{message}");
        assert!(message.contains("running"), "{message}");
    }

    /// Validates an outer deadline cuts a longer budget short.
    ///
    /// Assertions:
    /// - Confirms total virtual sleep never exceeds the outer deadline.
    /// - Ensures the result is a timeout.
    #[test]
    fn test_outer_deadline_wins() {
        let clock = MockClock::new();
        let deadline = clock.now() + Duration::from_secs(3);
        let retrier = BackoffRetrier::with_clock(clock.clone()).with_deadline(deadline);
        let budget = OperationBudget::fixed(Duration::from_secs(600), Duration::from_secs(2));

        let result: RetryResult<(), &str> = retrier.retry(&budget, || Err(Attempt::retry("busy")));

        assert!(result.unwrap_err().is_timeout());
        assert_eq!(clock.total_slept(), Duration::from_secs(3));
    }

    /// Validates an already-expired outer deadline still allows one attempt.
    ///
    /// Assertions:
    /// - Confirms exactly one attempt and zero sleeps.
    #[test]
    fn test_expired_outer_deadline_attempts_once() {
        let clock = MockClock::new();
        let deadline = clock.now();
        clock.advance(Duration::from_secs(1));
        let retrier = BackoffRetrier::with_clock(clock.clone()).with_deadline(deadline);
        let budget = OperationBudget::new(Duration::from_secs(600));
        let mut calls = 0;

        let result: RetryResult<(), &str> = retrier.retry(&budget, || {
            calls += 1;
            Err(Attempt::retry("busy"))
        });

        assert!(result.unwrap_err().is_timeout());
        assert_eq!(calls, 1);
        assert_eq!(clock.sleep_count(), 0);
    }

    /// Validates time spent inside attempts counts against the budget.
    ///
    /// Assertions:
    /// - Confirms the loop stops once slow attempts consume the budget.
    #[test]
    fn test_attempt_time_counts_against_budget() {
        let (retrier, clock) = mock_retrier();
        let budget = OperationBudget::fixed(Duration::from_secs(10), Duration::from_secs(1));
        let mut calls = 0;

        let result: RetryResult<(), &str> = retrier.retry(&budget, || {
            calls += 1;
            clock.advance(Duration::from_secs(4));
            Err(Attempt::retry("slow"))
        });

        assert!(result.unwrap_err().is_timeout());
        // 4s + 1s + 4s + 1s = 10s, then a final attempt overshoots
        assert_eq!(calls, 3);
    }

    /// Validates an attached rate limiter gates every attempt.
    ///
    /// Assertions:
    /// - Confirms the first attempt uses a full bucket without waiting.
    /// - Confirms later attempts wait for refills on top of backoff.
    /// - Confirms the report and the retrier expose the throttling.
    #[test]
    fn test_rate_limiter_gates_attempts() {
        let clock = MockClock::new();
        let config = TokenBucketConfig::new(1, 1, Duration::from_secs(3)).unwrap();
        let limiter = Arc::new(OperationRateLimiter::new(config));
        let retrier = BackoffRetrier::with_clock(clock.clone())
            .named("DescribeTasks")
            .with_rate_limiter(Arc::clone(&limiter));
        let budget = OperationBudget::fixed(Duration::from_secs(60), Duration::from_secs(1));
        let mut calls = 0;

        let (result, report) = retrier.retry_with_report(&budget, || {
            calls += 1;
            if calls < 3 {
                Err(Attempt::retry("pending"))
            } else {
                Ok(calls)
            }
        });

        assert_eq!(result.unwrap(), 3);
        // backoff 1s, then 2s until the refill, twice
        assert_eq!(
            clock.recorded_sleeps(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(1),
                Duration::from_secs(2)
            ]
        );
        assert_eq!(report.throttled, Duration::from_secs(4));
        assert_eq!(report.total_delay, Duration::from_secs(2));
        assert!(retrier.rate_limiter().is_some());
        assert_eq!(limiter.available("DescribeTasks", &clock), 0);
        assert_eq!(limiter.available("other", &clock), 1);
    }

    /// Validates `Attempt` helpers.
    ///
    /// Assertions:
    /// - Confirms `map` keeps the classification.
    /// - Confirms `into_inner` returns the payload.
    #[test]
    fn test_attempt_helpers() {
        let retry = Attempt::retry(2).map(|v| v * 10);
        assert!(retry.is_retry());
        assert_eq!(retry.into_inner(), 20);

        let fatal: Attempt<&str> = Attempt::fatal("x");
        assert!(!fatal.is_retry());
    }
}
