//! Configuration types
//!
//! Board-agnostic configuration structures, loaded from TOML by the binary.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
