//! Shackle probe math
//!
//! Turns one raw feedback sample into a calibrated angle and classifies
//! the shackle as open or closed against a fixed threshold.

pub mod calibration;

pub use calibration::{ProbeCalibration, ProbeClassifier, ProbeOutcome, ProbeReading, MAX_ANGLE_X10};
