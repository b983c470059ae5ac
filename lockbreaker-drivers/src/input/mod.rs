//! Operator input: rotary encoder and its push button

pub mod button;
pub mod encoder;

pub use button::{Button, ButtonClassifier, ButtonEvent};
pub use encoder::{DetentDecoder, RotaryEncoder};
