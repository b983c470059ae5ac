//! Manual seed entry model
//!
//! The operator picks the starting combination on the encoder before the
//! run. The front end owns an [`InputBuffer`] behind its display lock.

pub mod buffer;

pub use buffer::InputBuffer;
