//! Raspberry Pi HAL for the dialing rig
//!
//! This crate provides `rppal`-backed implementations of the shared
//! `lockbreaker-hal` traits, plus board bring-up:
//!
//! - GPIO outputs and pulled-up inputs
//! - Software PWM on the servo pin
//! - SPI bus for the MCP3008 feedback ADC
//! - I2C bus for the LCD backpack
//! - [`Board`], which claims every pin the configuration names
//!
//! Dropping a wrapper hands the pin back to the kernel in the state it was
//! found, which is how the binary releases the hardware on exit.

#![deny(unsafe_code)]

pub mod board;
pub mod gpio;
pub mod i2c;
pub mod pwm;
pub mod spi;

pub use board::{Board, BoardError};
pub use gpio::{RpiInput, RpiOutput};
pub use i2c::RpiI2c;
pub use pwm::RpiPwm;
pub use spi::RpiSpi;

/// Blocking delay implementing `embedded_hal::delay::DelayNs`
pub type Delay = rppal::hal::Delay;

/// Create a delay provider
pub fn delay() -> Delay {
    rppal::hal::Delay::new()
}
