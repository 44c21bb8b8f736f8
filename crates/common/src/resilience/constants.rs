// Constants for the retry engine
use std::time::Duration;

/// Default delay between attempts when a budget does not name one
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default growth factor for capped-exponential delays
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

/// Default cap for capped-exponential delays
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Maximum exponent for exponential backoff calculation to prevent overflow
pub const MAX_BACKOFF_EXPONENT: u32 = 30;

/// Operation name used in logs when the caller does not supply one
pub const DEFAULT_OPERATION_NAME: &str = "operation";

/// Permits granted per operation in each rate-limit interval
pub const DEFAULT_REQUESTS_PER_INTERVAL: u64 = 20;

/// Rate-limit refill interval
pub const DEFAULT_RATE_LIMIT_INTERVAL: Duration = Duration::from_secs(1);
