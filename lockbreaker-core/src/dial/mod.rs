//! Dial model
//!
//! Combinations, their enumeration order, and the stepper position
//! tracking that turns a combination into physical moves.

pub mod combination;
pub mod position;

pub use combination::{
    Combination, CombinationError, DigitIndex, Enumerator, COMBINATION_COUNT, DIAL_NUMBERS,
};
pub use position::{DialGeometry, DialMove, DialPlan, DialPosition, PositionTracker};
