//! Logging setup for binaries and tests embedding the reconciliation core
//!
//! The core and common crates only emit `tracing` events; installing a
//! subscriber is left to the outermost layer.

pub mod logging;

pub use logging::{init_logging, LogFormat, DEFAULT_FILTER};
