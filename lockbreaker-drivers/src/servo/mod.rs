//! Shackle actuators

pub mod shackle;

pub use shackle::ShackleServo;
