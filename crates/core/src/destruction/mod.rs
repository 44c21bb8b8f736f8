//! Two-phase teardown with verified absence
//!
//! ```text
//! Active --isolate / terminate contract--> Isolated --purge--> Offline --absent--> Verified
//! ```

pub mod ports;
pub mod sequencer;

pub use ports::DestructionPort;
pub use sequencer::{
    DestructionBudgets, DestructionOutcome, DestructionSequencer, DestructionState, TeardownPath,
};
