//! Configuration loading
//!
//! The machine configuration is a TOML file on the rig. The copy of
//! `machine.toml` compiled into the binary is used when no file exists.

mod loader;

pub use loader::{load, SlipCheckConfig};
