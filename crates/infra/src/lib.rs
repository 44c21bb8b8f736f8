//! # Converge Infrastructure
//!
//! Outer layer around the reconciliation core.
//!
//! This crate contains:
//! - Budget configuration loading (environment, TOML, JSON)
//! - Conversion of user-facing timeouts into operation budgets
//! - `tracing-subscriber` initialisation
//!
//! ## Architecture
//! - Depends only on `converge-common`
//! - Contains all "impure" code (environment, files, global subscriber)

pub mod config;
pub mod observability;

// Re-export commonly used items
pub use config::{BudgetConfig, Budgets};
pub use observability::{init_logging, LogFormat};
