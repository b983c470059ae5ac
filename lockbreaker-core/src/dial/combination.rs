//! Lock combinations and their enumeration order
//!
//! A combination is three dial numbers. The enumerator walks them as a
//! base-40 odometer with the third digit turning fastest, so the run can
//! start from any operator-chosen seed and never repeats a combination.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Numbers printed on the dial (0..=39)
pub const DIAL_NUMBERS: u8 = 40;

/// Total number of distinct combinations
pub const COMBINATION_COUNT: u32 = (DIAL_NUMBERS as u32) * (DIAL_NUMBERS as u32) * (DIAL_NUMBERS as u32);

/// Errors when building a combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinationError {
    /// A digit was outside 0..40
    DigitOutOfRange(u8),
    /// Text was not of the form `DD-DD-DD`
    Malformed,
}

impl fmt::Display for CombinationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DigitOutOfRange(d) => write!(f, "digit {} is not on the dial (0-39)", d),
            Self::Malformed => write!(f, "expected a combination like 07-21-33"),
        }
    }
}

/// Position of a digit within a combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DigitIndex {
    /// First number dialled (after the reset spins)
    First,
    /// Second number dialled (opposite direction)
    Second,
    /// Third number dialled
    Third,
}

impl DigitIndex {
    /// All indices in dialling order
    pub const ALL: [DigitIndex; 3] = [DigitIndex::First, DigitIndex::Second, DigitIndex::Third];

    /// Zero-based position
    pub const fn as_usize(self) -> usize {
        match self {
            DigitIndex::First => 0,
            DigitIndex::Second => 1,
            DigitIndex::Third => 2,
        }
    }

    /// The next index to the right, if any
    pub const fn next(self) -> Option<Self> {
        match self {
            DigitIndex::First => Some(DigitIndex::Second),
            DigitIndex::Second => Some(DigitIndex::Third),
            DigitIndex::Third => None,
        }
    }

    /// The previous index, saturating at the first digit
    pub const fn previous(self) -> Self {
        match self {
            DigitIndex::First | DigitIndex::Second => DigitIndex::First,
            DigitIndex::Third => DigitIndex::Second,
        }
    }
}

/// One candidate dial code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Combination {
    first: u8,
    second: u8,
    third: u8,
}

impl Combination {
    /// Lowest combination (00-00-00)
    pub const MIN: Self = Self {
        first: 0,
        second: 0,
        third: 0,
    };

    /// Highest combination (39-39-39), the last one enumerated
    pub const MAX: Self = Self {
        first: DIAL_NUMBERS - 1,
        second: DIAL_NUMBERS - 1,
        third: DIAL_NUMBERS - 1,
    };

    /// Create a combination, rejecting digits that are not on the dial
    pub fn new(first: u8, second: u8, third: u8) -> Result<Self, CombinationError> {
        for digit in [first, second, third] {
            if digit >= DIAL_NUMBERS {
                return Err(CombinationError::DigitOutOfRange(digit));
            }
        }
        Ok(Self {
            first,
            second,
            third,
        })
    }

    /// Build from digits, each reduced modulo 40
    pub const fn wrapping(first: u8, second: u8, third: u8) -> Self {
        Self {
            first: first % DIAL_NUMBERS,
            second: second % DIAL_NUMBERS,
            third: third % DIAL_NUMBERS,
        }
    }

    /// Rebuild from a 0-based ordinal in enumeration order
    pub fn from_ordinal(ordinal: u32) -> Option<Self> {
        if ordinal >= COMBINATION_COUNT {
            return None;
        }
        let n = DIAL_NUMBERS as u32;
        Some(Self {
            first: (ordinal / (n * n)) as u8,
            second: ((ordinal / n) % n) as u8,
            third: (ordinal % n) as u8,
        })
    }

    /// First digit
    pub const fn first(&self) -> u8 {
        self.first
    }

    /// Second digit
    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Third digit
    pub const fn third(&self) -> u8 {
        self.third
    }

    /// Digit at the given position
    pub const fn digit(&self, index: DigitIndex) -> u8 {
        match index {
            DigitIndex::First => self.first,
            DigitIndex::Second => self.second,
            DigitIndex::Third => self.third,
        }
    }

    /// All three digits in dialling order
    pub const fn digits(&self) -> [u8; 3] {
        [self.first, self.second, self.third]
    }

    /// 0-based position of this combination in enumeration order
    pub fn ordinal(&self) -> u32 {
        let n = DIAL_NUMBERS as u32;
        self.first as u32 * n * n + self.second as u32 * n + self.third as u32
    }

    /// Next combination in odometer order, or `None` after 39-39-39
    pub fn next(&self) -> Option<Self> {
        let mut first = self.first;
        let mut second = self.second;
        let mut third = self.third + 1;

        if third >= DIAL_NUMBERS {
            third = 0;
            second += 1;
            if second >= DIAL_NUMBERS {
                second = 0;
                first += 1;
                if first >= DIAL_NUMBERS {
                    return None;
                }
            }
        }

        Some(Self {
            first,
            second,
            third,
        })
    }

    /// True when the innermost digit sits at zero
    ///
    /// Happens once every 40 consecutive combinations; the orchestrator uses
    /// it as the checkpoint for the slip check.
    pub const fn is_inner_cycle_start(&self) -> bool {
        self.third == 0
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}-{:02}", self.first, self.second, self.third)
    }
}

impl FromStr for Combination {
    type Err = CombinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('-');
        let mut digits = [0u8; 3];
        for digit in digits.iter_mut() {
            let part = parts.next().ok_or(CombinationError::Malformed)?;
            *digit = part
                .trim()
                .parse::<u8>()
                .map_err(|_| CombinationError::Malformed)?;
        }
        if parts.next().is_some() {
            return Err(CombinationError::Malformed);
        }
        Self::new(digits[0], digits[1], digits[2])
    }
}

impl From<Combination> for (u8, u8, u8) {
    fn from(c: Combination) -> Self {
        (c.first, c.second, c.third)
    }
}

/// Lazy, finite walk over combinations starting at a seed
///
/// Enumeration starts exactly at the seed; combinations before it are
/// never produced.
#[derive(Debug, Clone)]
pub struct Enumerator {
    upcoming: Option<Combination>,
}

impl Enumerator {
    /// Start enumerating at `seed` (inclusive)
    pub fn start(seed: Combination) -> Self {
        Self {
            upcoming: Some(seed),
        }
    }

    /// Combination that the next call to `next()` will yield
    pub fn peek(&self) -> Option<Combination> {
        self.upcoming
    }

    /// Number of combinations still to come
    pub fn remaining(&self) -> u32 {
        self.upcoming
            .map(|c| COMBINATION_COUNT - c.ordinal())
            .unwrap_or(0)
    }
}

impl Iterator for Enumerator {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        let current = self.upcoming?;
        self.upcoming = current.next();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Enumerator {}

impl core::iter::FusedIterator for Enumerator {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn combo(a: u8, b: u8, c: u8) -> Combination {
        Combination::new(a, b, c).unwrap()
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(
            Combination::new(40, 0, 0),
            Err(CombinationError::DigitOutOfRange(40))
        );
        assert_eq!(
            Combination::new(0, 0, 255),
            Err(CombinationError::DigitOutOfRange(255))
        );
        assert!(Combination::new(39, 39, 39).is_ok());
    }

    #[test]
    fn test_next_increments_third() {
        assert_eq!(combo(0, 0, 0).next(), Some(combo(0, 0, 1)));
        assert_eq!(combo(12, 5, 38).next(), Some(combo(12, 5, 39)));
    }

    #[test]
    fn test_next_carries() {
        assert_eq!(combo(0, 0, 39).next(), Some(combo(0, 1, 0)));
        assert_eq!(combo(3, 39, 39).next(), Some(combo(4, 0, 0)));
        assert_eq!(combo(39, 38, 39).next(), Some(combo(39, 39, 0)));
    }

    #[test]
    fn test_next_terminal() {
        assert_eq!(Combination::MAX.next(), None);
    }

    #[test]
    fn test_display_zero_padded() {
        assert_eq!(format!("{}", combo(0, 7, 39)), "00-07-39");
    }

    #[test]
    fn test_parse() {
        assert_eq!("07-21-33".parse::<Combination>(), Ok(combo(7, 21, 33)));
        assert_eq!(" 0-0-1 ".parse::<Combination>(), Ok(combo(0, 0, 1)));
        assert_eq!(
            "07-21".parse::<Combination>(),
            Err(CombinationError::Malformed)
        );
        assert_eq!(
            "07-21-33-01".parse::<Combination>(),
            Err(CombinationError::Malformed)
        );
        assert_eq!(
            "07-xx-33".parse::<Combination>(),
            Err(CombinationError::Malformed)
        );
        assert_eq!(
            "07-40-33".parse::<Combination>(),
            Err(CombinationError::DigitOutOfRange(40))
        );
    }

    #[test]
    fn test_enumerator_starts_at_seed() {
        let mut e = Enumerator::start(combo(39, 39, 38));
        assert_eq!(e.remaining(), 2);
        assert_eq!(e.next(), Some(combo(39, 39, 38)));
        assert_eq!(e.next(), Some(Combination::MAX));
        assert_eq!(e.next(), None);
        assert_eq!(e.next(), None);
        assert_eq!(e.remaining(), 0);
    }

    #[test]
    fn test_full_enumeration_count() {
        assert_eq!(Enumerator::start(Combination::MIN).count(), 64_000);
    }

    #[test]
    fn test_inner_cycle_start_every_forty() {
        let starts = Enumerator::start(Combination::MIN)
            .take(400)
            .filter(|c| c.is_inner_cycle_start())
            .count();
        assert_eq!(starts, 10);
    }

    #[test]
    fn test_digit_index_navigation() {
        assert_eq!(DigitIndex::First.next(), Some(DigitIndex::Second));
        assert_eq!(DigitIndex::Third.next(), None);
        assert_eq!(DigitIndex::First.previous(), DigitIndex::First);
        assert_eq!(DigitIndex::Third.previous(), DigitIndex::Second);
    }

    proptest! {
        #[test]
        fn prop_next_below_39_touches_only_third(a in 0u8..40, b in 0u8..40, c in 0u8..39) {
            let next = combo(a, b, c).next().unwrap();
            prop_assert_eq!(next, combo(a, b, c + 1));
        }

        #[test]
        fn prop_next_is_ordinal_successor(ordinal in 0u32..COMBINATION_COUNT - 1) {
            let c = Combination::from_ordinal(ordinal).unwrap();
            prop_assert_eq!(c.ordinal(), ordinal);
            prop_assert_eq!(c.next().unwrap().ordinal(), ordinal + 1);
        }

        #[test]
        fn prop_display_parse_identity(a in 0u8..40, b in 0u8..40, c in 0u8..40) {
            let original = combo(a, b, c);
            let text = format!("{}", original);
            prop_assert_eq!(text.parse::<Combination>(), Ok(original));
        }
    }
}
