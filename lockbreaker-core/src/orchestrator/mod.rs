//! Dial orchestrator
//!
//! Drives the position tracker, shackle probe, attempt log and slip check
//! through the run state machine.

pub mod engine;
pub mod observer;

pub use engine::{Orchestrator, Rig};
pub use observer::{RunNotice, RunObserver, RunReport};
