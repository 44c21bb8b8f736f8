//! # Converge Core
//!
//! Reconciliation logic for asynchronous control-plane operations.
//!
//! This crate contains:
//! - Classification of collaborator failures by call context
//! - Mutation submission, including the billing commit race
//! - Task tracking until a terminal status
//! - Convergence and absence checks over fresh snapshots
//! - Two-phase teardown
//! - Port traits for the collaborators behind each loop
//!
//! ## Architecture Principles
//! - Depends only on `converge-common` and `converge-domain`
//! - No HTTP, no vendor SDK, no configuration surface
//! - Blocking calls; the only suspension is the sleep between polls
//! - Time comes from a `Clock`, so every loop runs under `MockClock` in tests

pub mod classify;
pub mod destruction;
pub mod mutation;
pub mod reconciler;
pub mod state;
pub mod tasks;
pub mod trade;

mod outcome;

pub use classify::{classify, CallContext};
pub use destruction::{
    DestructionBudgets, DestructionOutcome, DestructionPort, DestructionSequencer,
    DestructionState, TeardownPath,
};
pub use mutation::MutationSubmitter;
pub use reconciler::{await_completion, retry, wait_until, Reconciler};
pub use state::{FieldTargets, SnapshotPort, StateReconciler};
pub use tasks::{
    AsyncTaskTracker, DealStatusMapping, IdentityMapping, StatusMapping,
    StrictStringStatusMapping, StringStatusMapping, TaskStatusPort,
};
pub use trade::{MeteredOutcome, TradeRaceClassifier, TradeRaceState, TradeRaceTracker, TradeVerdict};
