// Summary statistics for a single retry run
use std::fmt;
use std::time::Duration;

/// Statistics collected while a [`BackoffRetrier`](super::BackoffRetrier)
/// drives one operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryReport {
    /// Number of attempts made
    pub attempts: u32,
    /// Number of sleeps between attempts
    pub sleeps: u32,
    /// Total delay accumulated across all sleeps
    pub total_delay: Duration,
    /// Time spent waiting for rate-limit permits
    pub throttled: Duration,
    /// Whether the operation ultimately succeeded
    pub succeeded: bool,
    /// Whether the budget ran out while the operation was still retryable
    pub timed_out: bool,
}

impl RetryReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Average delay between attempts, if any sleep happened
    pub fn average_delay(&self) -> Option<Duration> {
        if self.sleeps == 0 {
            None
        } else {
            Some(self.total_delay / self.sleeps)
        }
    }

    /// True when the operation ended with a fatal failure
    pub fn failed_fatally(&self) -> bool {
        !self.succeeded && !self.timed_out && self.attempts > 0
    }
}

impl fmt::Display for RetryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RetryReport {{ attempts: {}, sleeps: {}, total_delay: {:?}, throttled: {:?}, succeeded: {}, timed_out: {} }}",
            self.attempts,
            self.sleeps,
            self.total_delay,
            self.throttled,
            self.succeeded,
            self.timed_out
        )
    }
}
