//! Testing utilities and helpers
//!
//! - **[`time`]**: the [`Clock`] abstraction with a real [`SystemClock`] and a
//!   virtual [`MockClock`] that records every sleep
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use converge_common::testing::{Clock, MockClock};
//!
//! let clock = MockClock::new();
//! clock.sleep(Duration::from_secs(5));
//! assert_eq!(clock.sleep_count(), 1);
//! ```

pub mod time;

pub use time::{Clock, MockClock, SystemClock};
