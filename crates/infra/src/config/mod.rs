//! Budget configuration
//!
//! The core never reads configuration; callers load a [`BudgetConfig`] here
//! and hand the derived budgets to each call.

pub mod budgets;
pub mod loader;

pub use budgets::{BudgetConfig, Budgets};
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
