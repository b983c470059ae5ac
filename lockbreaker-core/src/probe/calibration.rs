//! Feedback calibration and open/closed classification
//!
//! The servo's feedback potentiometer is read through a 10-bit ADC. A
//! fixed affine transform maps the raw value to an angle estimate, stored
//! in tenths of a degree so the whole path stays in integer math.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound of a calibrated reading (180.0°)
pub const MAX_ANGLE_X10: u16 = 1800;

/// Calibrated feedback angle in tenths of a degree, always in `[0, 1800]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ProbeReading(u16);

impl ProbeReading {
    /// Build a reading, clamping into range
    pub fn from_x10(angle_x10: i64) -> Self {
        Self(angle_x10.clamp(0, MAX_ANGLE_X10 as i64) as u16)
    }

    /// Angle in tenths of a degree
    pub const fn angle_x10(&self) -> u16 {
        self.0
    }

    /// Angle in whole degrees (truncated)
    pub const fn degrees(&self) -> u16 {
        self.0 / 10
    }
}

impl fmt::Display for ProbeReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}°", self.0 / 10, self.0 % 10)
    }
}

/// Whether the shackle gave way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProbeOutcome {
    /// The shackle moved past the threshold: the lock is open
    Open,
    /// The shackle held
    Closed,
}

impl ProbeOutcome {
    /// True for [`ProbeOutcome::Open`]
    pub const fn is_open(&self) -> bool {
        matches!(self, ProbeOutcome::Open)
    }
}

/// Affine map from raw ADC counts to a feedback angle
///
/// `angle = (raw / adc_max * 180° - offset) * scale`, with the raw term
/// mirrored when the potentiometer is wired backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProbeCalibration {
    /// Full-scale ADC count (1023 for a 10-bit converter)
    pub adc_max: u16,
    /// Potentiometer reads high at 0°
    pub inverted: bool,
    /// Offset subtracted from the uncalibrated angle, tenths of a degree
    pub offset_x10: i32,
    /// Gain applied after the offset (value × 100)
    pub scale_x100: i32,
}

impl Default for ProbeCalibration {
    fn default() -> Self {
        Self {
            adc_max: 1023,
            inverted: false,
            offset_x10: 100,
            scale_x100: 132,
        }
    }
}

impl ProbeCalibration {
    /// Identity calibration (raw span maps straight onto 0-180°)
    pub const fn linear(adc_max: u16) -> Self {
        Self {
            adc_max,
            inverted: false,
            offset_x10: 0,
            scale_x100: 100,
        }
    }

    /// Convert one raw sample into a clamped reading
    pub fn reading(&self, raw: u16) -> ProbeReading {
        if self.adc_max == 0 {
            return ProbeReading::default();
        }
        let adc_max = self.adc_max as i64;
        let raw = raw as i64;
        let span = if self.inverted { adc_max - raw } else { raw };
        let base_x10 = span * MAX_ANGLE_X10 as i64 / adc_max;
        let calibrated = (base_x10 - self.offset_x10 as i64) * self.scale_x100 as i64 / 100;
        ProbeReading::from_x10(calibrated)
    }
}

/// Calibration plus the open threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProbeClassifier {
    /// Raw-to-angle calibration
    pub calibration: ProbeCalibration,
    /// Readings strictly above this are Open (tenths of a degree)
    pub threshold_x10: u16,
}

impl Default for ProbeClassifier {
    fn default() -> Self {
        Self {
            calibration: ProbeCalibration::default(),
            threshold_x10: 1600,
        }
    }
}

impl ProbeClassifier {
    /// Classify a calibrated reading
    pub fn classify(&self, reading: ProbeReading) -> ProbeOutcome {
        if reading.angle_x10() > self.threshold_x10 {
            ProbeOutcome::Open
        } else {
            ProbeOutcome::Closed
        }
    }

    /// Calibrate and classify one raw sample
    pub fn evaluate(&self, raw: u16) -> (ProbeReading, ProbeOutcome) {
        let reading = self.calibration.reading(raw);
        (reading, self.classify(reading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_linear_calibration_endpoints() {
        let cal = ProbeCalibration::linear(1023);
        assert_eq!(cal.reading(0).angle_x10(), 0);
        assert_eq!(cal.reading(1023).angle_x10(), 1800);
        // Mid-scale: 512 * 1800 / 1023 = 900
        assert_eq!(cal.reading(512).angle_x10(), 900);
    }

    #[test]
    fn test_default_calibration() {
        let cal = ProbeCalibration::default();
        // 1023 counts -> 180.0° -> (1800 - 100) * 1.32 = 2244 -> clamped
        assert_eq!(cal.reading(1023).angle_x10(), 1800);
        // 0 counts -> (0 - 100) * 1.32 < 0 -> clamped
        assert_eq!(cal.reading(0).angle_x10(), 0);
        // 800 counts -> 1407 -> (1407 - 100) * 1.32 = 1725
        assert_eq!(cal.reading(800).angle_x10(), 1725);
    }

    #[test]
    fn test_inverted_calibration() {
        let cal = ProbeCalibration {
            inverted: true,
            ..ProbeCalibration::linear(1023)
        };
        assert_eq!(cal.reading(0).angle_x10(), 1800);
        assert_eq!(cal.reading(1023).angle_x10(), 0);
    }

    #[test]
    fn test_zero_span_is_safe() {
        let cal = ProbeCalibration::linear(0);
        assert_eq!(cal.reading(500).angle_x10(), 0);
    }

    #[test]
    fn test_classify_threshold_is_exclusive() {
        let classifier = ProbeClassifier {
            calibration: ProbeCalibration::linear(1800),
            threshold_x10: 1600,
        };
        assert_eq!(classifier.evaluate(1600).1, ProbeOutcome::Closed);
        assert_eq!(classifier.evaluate(1601).1, ProbeOutcome::Open);
        assert_eq!(classifier.evaluate(0).1, ProbeOutcome::Closed);
    }

    #[test]
    fn test_reading_display() {
        assert_eq!(format!("{}", ProbeReading::from_x10(1725)), "172.5°");
    }

    proptest! {
        #[test]
        fn prop_reading_always_clamped(
            raw in any::<u16>(),
            adc_max in any::<u16>(),
            inverted in any::<bool>(),
            offset_x10 in -100_000i32..100_000,
            scale_x100 in -100_000i32..100_000,
        ) {
            let cal = ProbeCalibration { adc_max, inverted, offset_x10, scale_x100 };
            let reading = cal.reading(raw);
            prop_assert!(reading.angle_x10() <= MAX_ANGLE_X10);
        }
    }
}
