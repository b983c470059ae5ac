//! Timing and behaviour configuration
//!
//! Durations are whole milliseconds (microseconds for step pulses) so the
//! same values drive both the real delays and the mocked ones in tests.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settle delays around the three dial moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SettleConfig {
    /// Wait after landing on the first digit
    pub after_first_ms: u32,
    /// Wait after landing on the second digit
    pub after_second_ms: u32,
    /// Wait after landing on the third digit
    pub after_third_ms: u32,
    /// Extra wait before handing over to the shackle probe
    pub before_probe_ms: u32,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            after_first_ms: 1000,
            after_second_ms: 1000,
            after_third_ms: 500,
            before_probe_ms: 250,
        }
    }
}

impl SettleConfig {
    /// Settle time after each dial move, in move order
    pub const fn after_moves(&self) -> [u32; 3] {
        [self.after_first_ms, self.after_second_ms, self.after_third_ms]
    }

    /// Total settle time of one attempt
    pub fn total_ms(&self) -> u64 {
        self.after_moves().iter().map(|ms| *ms as u64).sum::<u64>() + self.before_probe_ms as u64
    }
}

/// Operator input timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputConfig {
    /// Hold time that turns a press into a long press
    pub long_press_ms: u32,
    /// A button level must hold this long before it counts
    pub debounce_ms: u32,
    /// Blink half-period of the digit being edited
    pub blink_ms: u32,
    /// Encoder/button polling period
    pub poll_ms: u32,
    /// How long the confirmed seed stays on screen
    pub confirm_ms: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            long_press_ms: 1500,
            debounce_ms: 20,
            blink_ms: 500,
            poll_ms: 1,
            confirm_ms: 1000,
        }
    }
}

/// Terminal screen timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UiConfig {
    /// Blink period of the "Lock OPEN!" screen
    pub success_blink_ms: u32,
    /// How long the slip warning stays up before the last combination
    pub slip_notice_ms: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            success_blink_ms: 800,
            slip_notice_ms: 3000,
        }
    }
}
