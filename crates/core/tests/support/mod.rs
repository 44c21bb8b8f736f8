//! Shared test helpers for `converge-core` integration tests.
//!
//! Provides a scripted in-memory control plane so scenario tests can focus on
//! the sequence of answers instead of boilerplate.

pub mod control_plane;

pub use control_plane::ScriptedControlPlane;
