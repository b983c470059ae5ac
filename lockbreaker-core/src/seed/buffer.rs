//! Seed combination being edited with the rotary encoder

use core::fmt::Write;

use heapless::String;

use crate::dial::{Combination, DigitIndex, DIAL_NUMBERS};
use crate::traits::DISPLAY_COLUMNS;

/// Digits, cursor, and the hand-off flag of the seed entry screen
///
/// The buffer hands out the confirmed seed exactly once. After that it is
/// inert: rotations and presses are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    digits: [u8; 3],
    cursor: DigitIndex,
    active: bool,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBuffer {
    /// Start editing at 00-00-00, cursor on the first digit
    pub const fn new() -> Self {
        Self {
            digits: [0; 3],
            cursor: DigitIndex::First,
            active: true,
        }
    }

    /// Start editing from an existing combination
    pub const fn starting_at(seed: Combination) -> Self {
        Self {
            digits: seed.digits(),
            cursor: DigitIndex::First,
            active: true,
        }
    }

    /// Still accepting input
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Digit under the cursor
    pub const fn current_digit(&self) -> DigitIndex {
        self.cursor
    }

    /// Combination as currently shown
    pub const fn combination(&self) -> Combination {
        Combination::wrapping(self.digits[0], self.digits[1], self.digits[2])
    }

    /// Turn the digit under the cursor by `detents`, wrapping modulo 40
    pub fn rotate(&mut self, detents: i8) {
        if !self.active || detents == 0 {
            return;
        }
        let slot = &mut self.digits[self.cursor.as_usize()];
        let turned = (*slot as i16 + detents as i16).rem_euclid(DIAL_NUMBERS as i16);
        *slot = turned as u8;
    }

    /// Short press: move right, or confirm on the last digit
    pub fn advance(&mut self) -> Option<Combination> {
        if !self.active {
            return None;
        }
        match self.cursor.next() {
            Some(next) => {
                self.cursor = next;
                None
            }
            None => {
                self.active = false;
                tracing::info!(seed = %self.combination(), "seed confirmed");
                Some(self.combination())
            }
        }
    }

    /// Long press: move one digit left
    pub fn back(&mut self) {
        if self.active {
            self.cursor = self.cursor.previous();
        }
    }

    /// Entry line, with the edited digit blanked while `blink` is set
    pub fn render(&self, blink: bool) -> String<DISPLAY_COLUMNS> {
        let mut line = String::new();
        let _ = line.push_str("Combo: ");
        for index in DigitIndex::ALL {
            if index != DigitIndex::First {
                let _ = line.push('-');
            }
            if blink && self.active && index == self.cursor {
                let _ = line.push_str("  ");
            } else {
                let _ = write!(line, "{:02}", self.digits[index.as_usize()]);
            }
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_wraps() {
        let mut buffer = InputBuffer::new();
        buffer.rotate(-1);
        assert_eq!(buffer.combination().first(), 39);
        buffer.rotate(2);
        assert_eq!(buffer.combination().first(), 1);
    }

    #[test]
    fn test_rotate_only_touches_current_digit() {
        let mut buffer = InputBuffer::new();
        buffer.advance();
        buffer.rotate(5);
        assert_eq!(buffer.combination().digits(), [0, 5, 0]);
    }

    #[test]
    fn test_confirms_once() {
        let mut buffer = InputBuffer::new();
        buffer.rotate(12);
        assert_eq!(buffer.advance(), None);
        buffer.rotate(34);
        assert_eq!(buffer.advance(), None);
        buffer.rotate(-1);

        let seed = buffer.advance();
        assert_eq!(seed, Some(Combination::wrapping(12, 34, 39)));
        assert!(!buffer.is_active());

        // Inert after hand-off
        assert_eq!(buffer.advance(), None);
        buffer.rotate(3);
        buffer.back();
        assert_eq!(buffer.combination(), Combination::wrapping(12, 34, 39));
    }

    #[test]
    fn test_back_saturates() {
        let mut buffer = InputBuffer::new();
        buffer.back();
        assert_eq!(buffer.current_digit(), DigitIndex::First);
        buffer.advance();
        buffer.advance();
        assert_eq!(buffer.current_digit(), DigitIndex::Third);
        buffer.back();
        assert_eq!(buffer.current_digit(), DigitIndex::Second);
    }

    #[test]
    fn test_render() {
        let mut buffer = InputBuffer::starting_at(Combination::wrapping(7, 8, 9));
        assert_eq!(buffer.render(false).as_str(), "Combo: 07-08-09");
        assert_eq!(buffer.render(true).as_str(), "Combo:   -08-09");
        buffer.advance();
        assert_eq!(buffer.render(true).as_str(), "Combo: 07-  -09");
    }

    #[test]
    fn test_render_fits_display() {
        let buffer = InputBuffer::new();
        assert!(buffer.render(false).len() <= DISPLAY_COLUMNS);
    }
}
