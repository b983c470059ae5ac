//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in lockbreaker-core for the rig's components:
//!
//! - Stepper driver (step/dir, A4988-style)
//! - Feedback ADC (MCP3008)
//! - Shackle servo probe
//! - Operator input (rotary encoder detents, push button)
//! - Character display (HD44780 behind a PCF8574 backpack)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod input;
pub mod sensor;
pub mod servo;
pub mod stepper;
