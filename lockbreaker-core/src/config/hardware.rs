//! Hardware configuration types
//!
//! These types define the hardware-level configuration for pins, the
//! dial stepper, the shackle servo, and the feedback ADC.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::{InputConfig, SettleConfig, UiConfig};
use crate::dial::DialGeometry;
use crate::probe::{ProbeClassifier, MAX_ANGLE_X10};

/// Highest servo angle in degrees
pub const MAX_SERVO_ANGLE: u16 = 180;

/// BCM pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinConfig {
    /// Stepper step pulse
    pub step: u8,
    /// Stepper direction
    pub dir: u8,
    /// Stepper driver enable
    pub enable: u8,
    /// Shackle servo signal (software PWM)
    pub servo: u8,
    /// Rotary encoder clock
    pub encoder_clk: u8,
    /// Rotary encoder data
    pub encoder_dt: u8,
    /// Encoder push button
    pub button: u8,
    /// SPI bus index of the ADC
    pub spi_bus: u8,
    /// SPI slave select of the ADC
    pub spi_ss: u8,
    /// I2C address of the LCD backpack
    pub lcd_address: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            step: 17,
            dir: 27,
            enable: 22,
            servo: 18,
            encoder_clk: 23,
            encoder_dt: 24,
            button: 25,
            spi_bus: 0,
            spi_ss: 0,
            lcd_address: 0x27,
        }
    }
}

impl PinConfig {
    /// GPIO pins claimed by the board, in a fixed order
    pub const fn gpio_pins(&self) -> [u8; 7] {
        [
            self.step,
            self.dir,
            self.enable,
            self.servo,
            self.encoder_clk,
            self.encoder_dt,
            self.button,
        ]
    }

    /// True when no GPIO pin is assigned twice
    pub fn is_unique(&self) -> bool {
        let pins = self.gpio_pins();
        pins.iter()
            .enumerate()
            .all(|(i, pin)| !pins[i + 1..].contains(pin))
    }
}

/// Step/dir driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StepperHwConfig {
    /// Time the step line is held high, then low, per pulse
    pub pulse_half_period_us: u32,
    /// Enable pin is active-low
    pub enable_active_low: bool,
    /// Direction pin level for a clockwise move
    pub clockwise_high: bool,
}

impl Default for StepperHwConfig {
    fn default() -> Self {
        Self {
            pulse_half_period_us: 300,
            enable_active_low: true,
            clockwise_high: false,
        }
    }
}

/// Shackle servo configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServoHwConfig {
    /// Angle that tugs the shackle
    pub move_angle: u16,
    /// Neutral angle between probes
    pub start_angle: u16,
    /// Hold at the move angle before sampling
    pub hold_ms: u32,
    /// Wait after each servo command before the PWM is released
    pub travel_ms: u32,
    /// PWM frequency
    pub pwm_hz: u16,
    /// Duty (per-mille of period) at 0°, 90° and 180°
    pub duty_x10: [u16; 3],
}

impl Default for ServoHwConfig {
    fn default() -> Self {
        Self {
            move_angle: 180,
            start_angle: 90,
            hold_ms: 2000,
            travel_ms: 1000,
            pwm_hz: 50,
            duty_x10: [44, 72, 100],
        }
    }
}

/// Feedback ADC configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProbeHwConfig {
    /// MCP3008 input channel wired to the servo potentiometer
    pub adc_channel: u8,
    /// Calibration and threshold
    pub classifier: ProbeClassifier,
}

impl Default for ProbeHwConfig {
    fn default() -> Self {
        Self {
            adc_channel: 0,
            classifier: ProbeClassifier::default(),
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MachineConfig {
    /// Dial geometry
    pub dial: DialGeometry,
    /// Stepper driver
    pub stepper: StepperHwConfig,
    /// Settle delays
    pub settle: SettleConfig,
    /// Shackle servo
    pub servo: ServoHwConfig,
    /// Feedback ADC and classification
    pub probe: ProbeHwConfig,
    /// Operator input timing
    pub input: InputConfig,
    /// Terminal screens
    pub ui: UiConfig,
    /// Pin assignment
    pub pins: PinConfig,
}

/// Reason a configuration was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssue {
    /// Fewer than two reset rotations, or zero steps per number
    DialGeometry,
    /// Zero-length step pulse
    PulseWidth,
    /// Threshold above 180.0°
    Threshold,
    /// ADC full scale of zero
    AdcRange,
    /// MCP3008 channel above 7
    AdcChannel,
    /// Servo angle above 180° or zero PWM frequency
    Servo,
    /// Zero long-press, blink or poll time, or debounce not shorter than a long press
    InputTiming,
    /// Same GPIO pin used twice
    PinConflict,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConfigIssue::DialGeometry => {
                "dial needs steps_per_number > 0 and reset_turns >= 2"
            }
            ConfigIssue::PulseWidth => "stepper pulse_half_period_us must be > 0",
            ConfigIssue::Threshold => "probe threshold_x10 must be <= 1800",
            ConfigIssue::AdcRange => "probe adc_max must be > 0",
            ConfigIssue::AdcChannel => "probe adc_channel must be 0-7",
            ConfigIssue::Servo => "servo angles must be <= 180 and pwm_hz > 0",
            ConfigIssue::InputTiming => "input timings must be > 0 and debounce_ms < long_press_ms",
            ConfigIssue::PinConflict => "a GPIO pin is assigned twice",
        };
        f.write_str(text)
    }
}

impl MachineConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every constraint the run relies on
    pub fn validate(&self) -> Result<(), ConfigIssue> {
        if !self.dial.is_valid() {
            return Err(ConfigIssue::DialGeometry);
        }
        if self.stepper.pulse_half_period_us == 0 {
            return Err(ConfigIssue::PulseWidth);
        }
        let classifier = &self.probe.classifier;
        if classifier.threshold_x10 > MAX_ANGLE_X10 {
            return Err(ConfigIssue::Threshold);
        }
        if classifier.calibration.adc_max == 0 {
            return Err(ConfigIssue::AdcRange);
        }
        if self.probe.adc_channel > 7 {
            return Err(ConfigIssue::AdcChannel);
        }
        if self.servo.move_angle > MAX_SERVO_ANGLE
            || self.servo.start_angle > MAX_SERVO_ANGLE
            || self.servo.pwm_hz == 0
        {
            return Err(ConfigIssue::Servo);
        }
        let input = &self.input;
        if input.long_press_ms == 0
            || input.blink_ms == 0
            || input.poll_ms == 0
            || input.debounce_ms >= input.long_press_ms
        {
            return Err(ConfigIssue::InputTiming);
        }
        if !self.pins.is_unique() {
            return Err(ConfigIssue::PinConflict);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MachineConfig::new();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.dial.full_rotation(), 800);
        assert_eq!(config.pins.lcd_address, 0x27);
    }

    #[test]
    fn test_rejects_single_reset_turn() {
        let mut config = MachineConfig::new();
        config.dial.reset_turns = 1;
        assert_eq!(config.validate(), Err(ConfigIssue::DialGeometry));
    }

    #[test]
    fn test_rejects_threshold_over_range() {
        let mut config = MachineConfig::new();
        config.probe.classifier.threshold_x10 = 1801;
        assert_eq!(config.validate(), Err(ConfigIssue::Threshold));
    }

    #[test]
    fn test_rejects_bad_servo() {
        let mut config = MachineConfig::new();
        config.servo.move_angle = 200;
        assert_eq!(config.validate(), Err(ConfigIssue::Servo));
    }

    #[test]
    fn test_rejects_zero_long_press() {
        let mut config = MachineConfig::new();
        config.input.long_press_ms = 0;
        assert_eq!(config.validate(), Err(ConfigIssue::InputTiming));
    }

    #[test]
    fn test_rejects_debounce_longer_than_long_press() {
        let mut config = MachineConfig::new();
        config.input.debounce_ms = config.input.long_press_ms;
        assert_eq!(config.validate(), Err(ConfigIssue::InputTiming));
    }

    #[test]
    fn test_rejects_pin_conflict() {
        let mut config = MachineConfig::new();
        config.pins.dir = config.pins.step;
        assert_eq!(config.validate(), Err(ConfigIssue::PinConflict));
    }

    #[test]
    fn test_settle_total() {
        assert_eq!(SettleConfig::default().total_ms(), 2750);
    }
}
