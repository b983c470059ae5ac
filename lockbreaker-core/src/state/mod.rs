//! Run state machine
//!
//! Defines the authoritative lifecycle of a brute-force run.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{HaltReason, RunState};
