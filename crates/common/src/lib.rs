//! Common foundation shared across Converge crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error taxonomy (`CommonError`, `ErrorClassification`)
//! - `runtime`: blocking retry engine, rate limiter, clock abstraction, retry
//!   tracing
//! - `observability`: `tracing` instrumentation (pulled in by `runtime`)
//! - `test-utils`: exposes the `testing` module to dependent crates' tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "runtime", feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
#[cfg(feature = "runtime")]
pub use resilience::{
    Attempt, BackoffRetrier, DelayPolicy, OperationBudget, OperationRateLimiter, RetryError,
    RetryReport, RetryResult, TokenBucketConfig,
};
#[cfg(feature = "runtime")]
pub use testing::{Clock, MockClock, SystemClock};
