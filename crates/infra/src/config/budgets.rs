//! User-facing timeouts and the operation budgets derived from them

use std::time::Duration;

use converge_common::error::{CommonError, CommonResult};
use converge_common::resilience::{OperationBudget, OperationRateLimiter, TokenBucketConfig};
use serde::{Deserialize, Serialize};

/// Default budget for reads
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 180;
/// Default budget for writes
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 300;
/// Default delay between attempts
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Describe budget as a multiple of the read timeout
pub const DEFAULT_DESCRIBE_MULTIPLIER: u32 = 20;
/// Task budget as a multiple of the write timeout
pub const DEFAULT_TASK_MULTIPLIER: u32 = 3;
/// Billed-write budget as a multiple of the write timeout
pub const DEFAULT_METERED_WRITE_MULTIPLIER: u32 = 6;
/// Isolation budget as a multiple of the write timeout
pub const DEFAULT_ISOLATE_MULTIPLIER: u32 = 10;
/// Absence-verification budget as a multiple of the read timeout
pub const DEFAULT_VERIFY_MULTIPLIER: u32 = 20;
/// Permits per second for each control-plane operation
pub const DEFAULT_REQUESTS_PER_SECOND: u64 = 20;

/// Timeouts as configured by the user, in seconds
///
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Read timeout in seconds
    pub read_timeout_secs: u64,
    /// Write timeout in seconds
    pub write_timeout_secs: u64,
    /// Delay between attempts in seconds
    pub poll_interval_secs: u64,
    /// Scales the read timeout for reads that wait out transitions
    pub describe_multiplier: u32,
    /// Scales the write timeout for task tracking
    pub task_multiplier: u32,
    /// Scales the write timeout for billed mutations
    pub metered_write_multiplier: u32,
    /// Scales the write timeout for isolation
    pub isolate_multiplier: u32,
    /// Scales the read timeout for confirming a resource is gone
    pub verify_multiplier: u32,
    /// Permits per second for each operation; 0 disables rate limiting
    pub requests_per_second: u64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            write_timeout_secs: DEFAULT_WRITE_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            describe_multiplier: DEFAULT_DESCRIBE_MULTIPLIER,
            task_multiplier: DEFAULT_TASK_MULTIPLIER,
            metered_write_multiplier: DEFAULT_METERED_WRITE_MULTIPLIER,
            isolate_multiplier: DEFAULT_ISOLATE_MULTIPLIER,
            verify_multiplier: DEFAULT_VERIFY_MULTIPLIER,
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
        }
    }
}

impl BudgetConfig {
    /// Reject poll intervals the loops cannot honour
    ///
    /// # Errors
    /// Returns `CommonError::Config` naming the offending field.
    pub fn validate(&self) -> CommonResult<()> {
        if self.poll_interval_secs == 0 {
            return Err(CommonError::config_field("poll_interval_secs", "poll interval must be positive"));
        }
        if self.poll_interval_secs > self.read_timeout_secs {
            return Err(CommonError::config_field(
                "poll_interval_secs",
                format!(
                    "poll interval {}s exceeds read timeout {}s",
                    self.poll_interval_secs, self.read_timeout_secs
                ),
            ));
        }
        for (field, value) in [
            ("describe_multiplier", self.describe_multiplier),
            ("task_multiplier", self.task_multiplier),
            ("metered_write_multiplier", self.metered_write_multiplier),
            ("isolate_multiplier", self.isolate_multiplier),
            ("verify_multiplier", self.verify_multiplier),
        ] {
            if value == 0 {
                return Err(CommonError::config_field(field, "multiplier must be positive"));
            }
        }
        Ok(())
    }

    /// Read timeout as a duration
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Write timeout as a duration
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    /// Delay between attempts as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Operation budgets for every call site
    pub fn budgets(&self) -> Budgets {
        let read = OperationBudget::fixed(self.read_timeout(), self.poll_interval());
        let write = OperationBudget::fixed(self.write_timeout(), self.poll_interval());

        Budgets {
            describe: read
                .scaled(self.describe_multiplier)
                .with_awaiting("waiting for the resource to leave a transitional state"),
            task: write.scaled(self.task_multiplier),
            metered_write: write
                .scaled(self.metered_write_multiplier)
                .with_awaiting("waiting for billing to commit the change"),
            destruction: write
                .scaled(self.isolate_multiplier)
                .with_awaiting("waiting for the resource to be isolated"),
            verify: read
                .scaled(self.verify_multiplier)
                .with_awaiting("waiting for the resource to be purged"),
            read,
            write,
        }
    }

    /// Per-operation rate limiter, or `None` when disabled
    pub fn rate_limiter(&self) -> Option<OperationRateLimiter> {
        TokenBucketConfig::per_second(self.requests_per_second).ok().map(OperationRateLimiter::new)
    }
}

/// Ready-to-use budgets derived from a [`BudgetConfig`]
#[derive(Debug, Clone)]
pub struct Budgets {
    /// Plain reads
    pub read: OperationBudget,
    /// Reads that wait out transitional states
    pub describe: OperationBudget,
    /// Task tracking after a mutation
    pub task: OperationBudget,
    /// Billed mutations
    pub metered_write: OperationBudget,
    /// Plain writes and the purge
    pub write: OperationBudget,
    /// Isolation or contract termination
    pub destruction: OperationBudget,
    /// Initial teardown read and confirming absence
    pub verify: OperationBudget,
}
