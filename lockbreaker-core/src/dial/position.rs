//! Dial position tracking
//!
//! The stepper has no encoder, so the tracker's count is the only record of
//! where the dial is. It changes only when a move has actually been issued
//! to the stepper, and always modulo one full rotation.
//!
//! Direction convention: turning the dial clockwise makes the number under
//! the index decrease, so `Clockwise` subtracts steps and
//! `CounterClockwise` adds them.

use super::combination::{Combination, DIAL_NUMBERS};
use crate::traits::{Direction, StepperDriver};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum number of clearing turns before the first number is valid
pub const MIN_RESET_TURNS: u8 = 2;

/// Mechanical geometry of the dial/stepper coupling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DialGeometry {
    /// Stepper steps between adjacent dial numbers
    pub steps_per_number: u16,
    /// Full turns made before settling on the first number (>= 2)
    pub reset_turns: u8,
}

impl Default for DialGeometry {
    fn default() -> Self {
        Self {
            steps_per_number: 20, // 200-step motor, 4x microstepping, 40 numbers
            reset_turns: 3,
        }
    }
}

impl DialGeometry {
    /// Steps in one full turn of the dial
    pub const fn full_rotation(&self) -> u32 {
        self.steps_per_number as u32 * DIAL_NUMBERS as u32
    }

    /// Absolute step position of a dial number
    pub const fn number_steps(&self, number: u8) -> u32 {
        number as u32 * self.steps_per_number as u32
    }

    /// Check the mechanical constraints hold
    pub fn is_valid(&self) -> bool {
        self.steps_per_number > 0 && self.reset_turns >= MIN_RESET_TURNS
    }
}

/// Absolute angular position of the stepper, in `[0, full_rotation)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DialPosition(u32);

impl DialPosition {
    /// The homed position (dial at 0)
    pub const HOME: Self = Self(0);

    /// Build a position from a raw step count, reduced modulo one rotation
    pub fn from_steps(steps: i64, geometry: &DialGeometry) -> Self {
        let full = geometry.full_rotation() as i64;
        Self(steps.rem_euclid(full) as u32)
    }

    /// Raw step count
    pub const fn steps(&self) -> u32 {
        self.0
    }

    /// Position after turning `steps` in `direction`
    pub fn advanced(self, mv: DialMove, geometry: &DialGeometry) -> Self {
        Self::from_steps(self.0 as i64 + mv.signed_steps(), geometry)
    }

    /// Dial number closest to this position
    pub fn nearest_number(&self, geometry: &DialGeometry) -> u8 {
        let spn = geometry.steps_per_number as u32;
        (((self.0 + spn / 2) / spn) % DIAL_NUMBERS as u32) as u8
    }

    /// Clockwise steps needed to bring `number` under the index
    ///
    /// This is the direct distance used for the third number: no extra
    /// rotation, zero when the dial already sits on `number`.
    pub fn clockwise_distance_to(&self, number: u8, geometry: &DialGeometry) -> u32 {
        let full = geometry.full_rotation() as i64;
        (self.0 as i64 - geometry.number_steps(number) as i64).rem_euclid(full) as u32
    }
}

/// One stepper move: a direction and a non-negative step count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DialMove {
    /// Rotation sense
    pub direction: Direction,
    /// Number of step pulses
    pub steps: u32,
}

impl DialMove {
    /// Clockwise move
    pub const fn clockwise(steps: u32) -> Self {
        Self {
            direction: Direction::Clockwise,
            steps,
        }
    }

    /// Counter-clockwise move
    pub const fn counter_clockwise(steps: u32) -> Self {
        Self {
            direction: Direction::CounterClockwise,
            steps,
        }
    }

    /// Step count signed by its effect on the position
    pub const fn signed_steps(&self) -> i64 {
        match self.direction {
            Direction::CounterClockwise => self.steps as i64,
            Direction::Clockwise => -(self.steps as i64),
        }
    }
}

/// The three moves that dial one combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialPlan {
    /// Reset spins plus the approach to the first number (clockwise)
    pub to_first: DialMove,
    /// Pass the first number once, then settle on the second (counter-clockwise)
    pub to_second: DialMove,
    /// Direct approach to the third number (clockwise)
    pub to_third: DialMove,
}

impl DialPlan {
    /// Compute the plan for `target` starting from `current`
    ///
    /// - First: `reset_turns * full - first * spn + current` clockwise. The
    ///   `current` term cancels the starting offset, so the dial lands on the
    ///   first number after at least `reset_turns` whole turns.
    /// - Second: `((full - (p1 - second * spn)) mod full) + full`
    ///   counter-clockwise, which always sweeps past the first number once.
    /// - Third: clockwise shortest distance, possibly zero.
    pub fn compute(target: Combination, current: DialPosition, geometry: &DialGeometry) -> Self {
        let full = geometry.full_rotation() as i64;
        let first = geometry.number_steps(target.first()) as i64;
        let second = geometry.number_steps(target.second()) as i64;

        let to_first = DialMove::clockwise(
            (geometry.reset_turns as i64 * full - first + current.steps() as i64) as u32,
        );
        let after_first = current.advanced(to_first, geometry);

        let to_second = DialMove::counter_clockwise(
            ((full - (after_first.steps() as i64 - second)).rem_euclid(full) + full) as u32,
        );
        let after_second = after_first.advanced(to_second, geometry);

        let to_third = DialMove::clockwise(after_second.clockwise_distance_to(target.third(), geometry));

        Self {
            to_first,
            to_second,
            to_third,
        }
    }

    /// Moves in execution order
    pub const fn moves(&self) -> [DialMove; 3] {
        [self.to_first, self.to_second, self.to_third]
    }

    /// Signed sum of all moves (counter-clockwise positive)
    pub fn net_steps(&self) -> i64 {
        self.moves().iter().map(DialMove::signed_steps).sum()
    }
}

/// Owner of the dial position
///
/// The position starts at home (the operator zeroes the dial before a run)
/// and is only changed by [`PositionTracker::execute`].
#[derive(Debug, Clone)]
pub struct PositionTracker {
    geometry: DialGeometry,
    position: DialPosition,
}

impl PositionTracker {
    /// Create a tracker at the home position
    pub fn new(geometry: DialGeometry) -> Self {
        Self {
            geometry,
            position: DialPosition::HOME,
        }
    }

    /// Current position
    pub fn position(&self) -> DialPosition {
        self.position
    }

    /// Dial geometry
    pub fn geometry(&self) -> &DialGeometry {
        &self.geometry
    }

    /// Plan the moves for `target` from the current position
    pub fn plan(&self, target: Combination) -> DialPlan {
        DialPlan::compute(target, self.position, &self.geometry)
    }

    /// Issue a move to the stepper and account for it
    ///
    /// The pulses are always issued in full before the position is updated;
    /// a move is never abandoned half way.
    pub fn execute<S: StepperDriver>(&mut self, stepper: &mut S, mv: DialMove) -> DialPosition {
        stepper.step(mv.direction, mv.steps);
        self.position = self.position.advanced(mv, &self.geometry);
        tracing::trace!(
            direction = ?mv.direction,
            steps = mv.steps,
            position = self.position.steps(),
            "dial move"
        );
        self.position
    }

    /// Declare the dial to be at home
    ///
    /// Only valid when the dial has physically been put back on 0.
    pub fn rehome(&mut self) {
        self.position = DialPosition::HOME;
    }
}
