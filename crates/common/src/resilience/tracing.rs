//! Tracing instrumentation for retry loops
//!
//! Emits structured `tracing` events with the fields `operation`, `attempt`,
//! `delay_ms` and `elapsed_ms` so a slow control plane can be told apart from
//! a rejected change by reading the logs alone.

use std::time::Duration;

use tracing::{debug, info, warn};

/// Attempts after which backoff events are promoted from debug to warn
const NOISY_ATTEMPT_THRESHOLD: u32 = 10;

/// Factory for [`RetrySpan`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryTracer;

impl RetryTracer {
    /// Create a new retry tracer
    pub fn new() -> Self {
        Self
    }

    /// Start instrumenting a retry loop
    pub fn start_retry_span(&self, operation_name: &str, budget: Duration) -> RetrySpan {
        debug!(
            operation = operation_name,
            budget_ms = budget.as_millis() as u64,
            "Starting retry operation"
        );

        RetrySpan { operation_name: operation_name.to_string(), budget }
    }
}

/// Event recorder for one retry loop
#[derive(Debug)]
pub struct RetrySpan {
    operation_name: String,
    budget: Duration,
}

impl RetrySpan {
    /// Name of the operation being retried
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    /// Record the start of an attempt
    pub fn record_attempt(&self, attempt: u32) {
        debug!(operation = %self.operation_name, attempt, "Attempt started");
    }

    /// Record time spent waiting for a rate-limit permit
    pub fn record_throttle(&self, attempt: u32, waited: Duration) {
        debug!(
            operation = %self.operation_name,
            attempt,
            waited_ms = waited.as_millis() as u64,
            "Attempt delayed by rate limit"
        );
    }

    /// Record a retryable failure followed by a backoff sleep
    pub fn record_backoff(&self, attempt: u32, delay: Duration, elapsed: Duration, error: &str) {
        if attempt >= NOISY_ATTEMPT_THRESHOLD {
            warn!(
                operation = %self.operation_name,
                attempt,
                delay_ms = delay.as_millis() as u64,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %error,
                "Still retrying"
            );
        } else {
            debug!(
                operation = %self.operation_name,
                attempt,
                delay_ms = delay.as_millis() as u64,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %error,
                "Retryable failure, backing off"
            );
        }
    }

    /// Record a successful completion
    pub fn record_success(&self, attempts: u32, elapsed: Duration) {
        info!(
            operation = %self.operation_name,
            attempts,
            elapsed_ms = elapsed.as_millis() as u64,
            "Operation succeeded"
        );
    }

    /// Record a fatal failure
    pub fn record_fatal(&self, attempt: u32, error: &str) {
        warn!(
            operation = %self.operation_name,
            attempt,
            error = %error,
            "Fatal failure, aborting retry"
        );
    }

    /// Record budget exhaustion
    pub fn record_timeout(&self, attempts: u32, elapsed: Duration, awaiting: &str) {
        warn!(
            operation = %self.operation_name,
            attempts,
            elapsed_ms = elapsed.as_millis() as u64,
            budget_ms = self.budget.as_millis() as u64,
            awaiting = %awaiting,
            "Retry budget exhausted"
        );
    }
}
