//! LockBreaker Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that are implemented by
//! board-specific HALs. The drivers and the dialing engine only ever see
//! these traits, so the whole stack can be exercised on a host with mock
//! pins and buses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (lockbreaker-firmware)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lockbreaker-hal (this crate - traits)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ lockbreaker-hal-│
//!            │      rpi        │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`spi::SpiBus`] - SPI bus operations (feedback ADC)
//! - [`i2c::I2cBus`] - I2C bus operations (character LCD backpack)
//! - [`pwm::PwmOutput`] - Pulse-width modulated output (shackle servo)

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod pwm;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use i2c::I2cBus;
pub use pwm::PwmOutput;
pub use spi::SpiBus;
