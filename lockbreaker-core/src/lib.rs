//! Board-agnostic core logic for the combination lock dialing rig
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (stepper, shackle probe, display, log, slip check)
//! - Combination enumeration and dial position tracking
//! - Shackle feedback calibration and open/closed classification
//! - Run state machine and the dial orchestrator driving it
//! - Seed entry model used by the encoder/LCD front end
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod dial;
pub mod orchestrator;
pub mod probe;
pub mod seed;
pub mod state;
pub mod traits;
