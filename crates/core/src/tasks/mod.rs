//! Tracking of asynchronous tasks started by a mutation
//!
//! The polling loop lives in [`AsyncTaskTracker`]; how a raw status is read
//! is decided by a [`StatusMapping`], so numeric deal codes and free-form
//! status strings share the same loop.

pub mod mapping;
pub mod ports;
pub mod tracker;

pub use mapping::{
    DealStatusMapping, IdentityMapping, StatusMapping, StrictStringStatusMapping,
    StringStatusMapping,
};
pub use ports::TaskStatusPort;
pub use tracker::{AsyncTaskTracker, DEFAULT_RACE_WINDOW_LIMIT};
