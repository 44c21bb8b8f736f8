//! Client-side rate limiting keyed by operation name
//!
//! Control planes throttle per API action. [`OperationRateLimiter`] keeps one
//! token bucket per operation name so a loop polling a status endpoint never
//! starves the mutation calls made by another loop.
//!
//! Buckets refill on a [`Clock`], so tests drive them with
//! [`MockClock`](crate::testing::MockClock). A caller that finds its bucket
//! empty sleeps on the same clock until the next refill.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use converge_common::resilience::{OperationRateLimiter, TokenBucketConfig};
//! use converge_common::testing::MockClock;
//!
//! let clock = MockClock::new();
//! let config = TokenBucketConfig::new(2, 2, Duration::from_secs(1)).unwrap();
//! let limiter = OperationRateLimiter::new(config);
//!
//! assert_eq!(limiter.acquire("DescribeDBInstances", &clock), Duration::ZERO);
//! assert_eq!(limiter.acquire("DescribeDBInstances", &clock), Duration::ZERO);
//! // Third call in the same second waits for the refill
//! assert_eq!(limiter.acquire("DescribeDBInstances", &clock), Duration::from_secs(1));
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::constants::{DEFAULT_RATE_LIMIT_INTERVAL, DEFAULT_REQUESTS_PER_INTERVAL};
use crate::error::{CommonError, CommonResult};
use crate::testing::time::Clock;

/// Capacity and refill rate of one token bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBucketConfig {
    capacity: u64,
    refill_amount: u64,
    refill_interval: Duration,
}

impl TokenBucketConfig {
    /// Create a validated configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any value is zero.
    pub fn new(capacity: u64, refill_amount: u64, refill_interval: Duration) -> CommonResult<Self> {
        let config = Self { capacity, refill_amount, refill_interval };
        config.validate()?;
        Ok(config)
    }

    /// `requests` permits per second, refilled all at once
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `requests` is zero.
    pub fn per_second(requests: u64) -> CommonResult<Self> {
        Self::new(requests, requests, Duration::from_secs(1))
    }

    /// Check every value is positive
    ///
    /// # Errors
    ///
    /// Names the first field that is zero.
    pub fn validate(&self) -> CommonResult<()> {
        if self.capacity == 0 {
            return Err(CommonError::config_field("capacity", "must be greater than 0"));
        }
        if self.refill_amount == 0 {
            return Err(CommonError::config_field("refill_amount", "must be greater than 0"));
        }
        if self.refill_interval.is_zero() {
            return Err(CommonError::config_field("refill_interval", "must be greater than 0"));
        }
        Ok(())
    }

    /// Maximum tokens a bucket holds
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Tokens added per refill interval
    pub fn refill_amount(&self) -> u64 {
        self.refill_amount
    }

    /// Time between refills
    pub fn refill_interval(&self) -> Duration {
        self.refill_interval
    }
}

impl Default for TokenBucketConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_REQUESTS_PER_INTERVAL,
            refill_amount: DEFAULT_REQUESTS_PER_INTERVAL,
            refill_interval: DEFAULT_RATE_LIMIT_INTERVAL,
        }
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: u64,
    last_refill: Instant,
}

impl Bucket {
    fn full(config: &TokenBucketConfig, now: Instant) -> Self {
        Self { tokens: config.capacity, last_refill: now }
    }

    /// Add every whole interval elapsed since the last refill
    fn refill(&mut self, config: &TokenBucketConfig, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let refills = elapsed.as_nanos() / config.refill_interval.as_nanos();
        if refills == 0 {
            return;
        }

        let added = u64::try_from(refills).unwrap_or(u64::MAX).saturating_mul(config.refill_amount);
        self.tokens = self.tokens.saturating_add(added).min(config.capacity);

        // Keep the partial interval so refills stay on their original cadence
        self.last_refill = match u32::try_from(refills)
            .ok()
            .and_then(|n| config.refill_interval.checked_mul(n))
            .and_then(|step| self.last_refill.checked_add(step))
        {
            Some(next) if self.tokens < config.capacity => next,
            _ => now,
        };
    }

    /// Time left until the next refill lands
    fn wait_for_refill(&self, config: &TokenBucketConfig, now: Instant) -> Duration {
        let since = now.saturating_duration_since(self.last_refill);
        config.refill_interval.saturating_sub(since)
    }
}

/// Token buckets keyed by operation name
///
/// Shared behind an `Arc` by every retrier that talks to the same control
/// plane. Buckets are created full on first use.
#[derive(Debug)]
pub struct OperationRateLimiter {
    default: TokenBucketConfig,
    overrides: HashMap<String, TokenBucketConfig>,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl Default for OperationRateLimiter {
    fn default() -> Self {
        Self::new(TokenBucketConfig::default())
    }
}

impl OperationRateLimiter {
    /// Limiter applying `default` to every operation
    pub fn new(default: TokenBucketConfig) -> Self {
        Self { default, overrides: HashMap::new(), buckets: Mutex::new(HashMap::new()) }
    }

    /// Use a dedicated limit for one operation
    #[must_use]
    pub fn with_limit(mut self, operation: impl Into<String>, config: TokenBucketConfig) -> Self {
        self.overrides.insert(operation.into(), config);
        self
    }

    /// Limit applied to `operation`
    pub fn config_for(&self, operation: &str) -> &TokenBucketConfig {
        self.overrides.get(operation).unwrap_or(&self.default)
    }

    /// Take one permit without waiting
    ///
    /// Returns `false` when the bucket for `operation` is empty.
    pub fn try_acquire<C: Clock + ?Sized>(&self, operation: &str, clock: &C) -> bool {
        let config = *self.config_for(operation);
        let now = clock.now();
        let mut buckets = self.lock_buckets();
        let bucket =
            buckets.entry(operation.to_string()).or_insert_with(|| Bucket::full(&config, now));
        bucket.refill(&config, now);

        if bucket.tokens == 0 {
            return false;
        }
        bucket.tokens -= 1;
        true
    }

    /// Take one permit, sleeping on `clock` until one is available
    ///
    /// Returns the total time spent waiting.
    pub fn acquire<C: Clock + ?Sized>(&self, operation: &str, clock: &C) -> Duration {
        let config = *self.config_for(operation);
        let mut waited = Duration::ZERO;

        loop {
            let now = clock.now();
            let wait = {
                let mut buckets = self.lock_buckets();
                let bucket = buckets
                    .entry(operation.to_string())
                    .or_insert_with(|| Bucket::full(&config, now));
                bucket.refill(&config, now);

                if bucket.tokens > 0 {
                    bucket.tokens -= 1;
                    if !waited.is_zero() {
                        debug!(
                            operation,
                            waited_ms = waited.as_millis() as u64,
                            "Rate limit permit acquired after waiting"
                        );
                    }
                    return waited;
                }
                bucket.wait_for_refill(&config, now)
            };

            // The lock is released while sleeping so other operations proceed
            clock.sleep(wait);
            waited += wait;
        }
    }

    /// Tokens currently left for `operation`, counting refills due at `now`
    pub fn available<C: Clock + ?Sized>(&self, operation: &str, clock: &C) -> u64 {
        let config = *self.config_for(operation);
        let now = clock.now();
        let mut buckets = self.lock_buckets();
        match buckets.get_mut(operation) {
            Some(bucket) => {
                bucket.refill(&config, now);
                bucket.tokens
            }
            None => config.capacity,
        }
    }

    fn lock_buckets(&self) -> MutexGuard<'_, HashMap<String, Bucket>> {
        match self.buckets.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Rate limiter lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}
