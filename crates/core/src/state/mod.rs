//! Convergence of remote state towards a target
//!
//! Every poll fetches a fresh snapshot; nothing is cached between polls.

pub mod ports;
pub mod reconciler;
pub mod targets;

pub use ports::SnapshotPort;
pub use reconciler::StateReconciler;
pub use targets::FieldTargets;
