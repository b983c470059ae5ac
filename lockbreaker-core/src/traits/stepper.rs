//! Stepper motor driver trait
//!
//! This trait abstracts over step/dir drivers (A4988, DRV8825, TMC2208 in
//! legacy mode, ...). Moves are blocking: `step` returns once every pulse
//! has been issued.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dial rotation direction, as seen by the operator facing the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Clockwise rotation (dial numbers decrease under the index)
    Clockwise,
    /// Counter-clockwise rotation (dial numbers increase under the index)
    CounterClockwise,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Trait for stepper motor drivers
///
/// There is no error path: a stalled motor cannot be detected without an
/// encoder, so the caller assumes every issued step was taken.
pub trait StepperDriver {
    /// Energise or release the motor coils
    ///
    /// When disabled, the motor is free to rotate and does not hold position.
    fn enable(&mut self, enabled: bool);

    /// Check if the motor is enabled
    fn is_enabled(&self) -> bool;

    /// Issue `steps` pulses in `direction`
    ///
    /// Must not return before the last pulse has completed.
    fn step(&mut self, direction: Direction, steps: u32);
}

impl<T: StepperDriver + ?Sized> StepperDriver for &mut T {
    fn enable(&mut self, enabled: bool) {
        (**self).enable(enabled)
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn step(&mut self, direction: Direction, steps: u32) {
        (**self).step(direction, steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite() {
        assert_eq!(Direction::Clockwise.opposite(), Direction::CounterClockwise);
        assert_eq!(Direction::CounterClockwise.opposite(), Direction::Clockwise);
    }
}
