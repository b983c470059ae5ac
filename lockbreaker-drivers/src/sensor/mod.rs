//! Feedback sensors

pub mod mcp3008;

pub use mcp3008::{AdcError, Mcp3008, Mcp3008Channel};
