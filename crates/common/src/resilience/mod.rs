//! Resilience patterns for remote operations that complete asynchronously
//!
//! - **Retry loop**: [`BackoffRetrier`] runs an attempt function inside an
//!   [`OperationBudget`], sleeping between attempts according to a
//!   [`DelayPolicy`].
//! - **Rate limiting**: [`OperationRateLimiter`] hands out one permit per
//!   attempt from a token bucket keyed by operation name.
//! - **Instrumentation**: [`RetryTracer`] and [`RetrySpan`] emit structured
//!   `tracing` events; [`RetryReport`] summarises a finished loop.
//!
//! The loop is synchronous and blocks the calling thread. Callers that want to
//! reconcile several independent resources at once run one loop per thread.
//!
//! | Outcome | Returned as |
//! |---------|-------------|
//! | Attempt succeeded | `Ok(T)` |
//! | Attempt returned `Attempt::Fatal` | `RetryError::Fatal` |
//! | Budget ran out while retryable | `RetryError::Timeout` |

pub mod constants;
pub mod metrics;
pub mod rate_limiter;
pub mod retry;
pub mod tracing;

pub use self::metrics::RetryReport;
pub use self::rate_limiter::{OperationRateLimiter, TokenBucketConfig};
pub use self::retry::{
    Attempt, BackoffRetrier, DelayPolicy, OperationBudget, RetryError, RetryResult,
};
pub use self::tracing::{RetrySpan, RetryTracer};
