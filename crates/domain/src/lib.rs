//! # Converge Domain
//!
//! Domain types for reconciling asynchronous control-plane operations.
//!
//! This crate contains:
//! - Task handles and the `Pending | Succeeded | Failed` status taxonomy
//! - Collaborator errors (`RemoteError`) and their classification
//! - Resource snapshots, lifecycle phases and billing modes
//! - `ReconcileError` and its `Result` alias
//! - Control-plane error codes and status lookup tables
//!
//! ## Architecture
//! - Depends only on the foundation tier of `converge-common`
//! - Pure data and lookups; no I/O, no sleeping

pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
