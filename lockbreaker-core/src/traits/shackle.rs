//! Shackle probe and feedback sensor traits

use crate::probe::{ProbeOutcome, ProbeReading};

/// Errors that can occur reading the actuator feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Bus transaction with the ADC failed
    Bus,
    /// Requested channel does not exist on the converter
    InvalidChannel,
}

/// Errors that can occur while probing the shackle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    /// Feedback could not be sampled
    Sensor(SensorError),
    /// Servo output could not be driven
    Actuator,
}

impl From<SensorError> for ProbeError {
    fn from(e: SensorError) -> Self {
        ProbeError::Sensor(e)
    }
}

/// Raw analog feedback source
///
/// Takes `&mut self` because ADC reads typically require mutable access.
pub trait FeedbackSensor {
    /// Take one raw sample
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

/// Result of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    /// Calibrated feedback angle
    pub reading: ProbeReading,
    /// Open/closed classification of `reading`
    pub outcome: ProbeOutcome,
}

/// Trait for the shackle actuator
///
/// One call is one authoritative attempt: bump, hold, sample once,
/// classify, then return to the start position.
pub trait ShackleProbe {
    /// Tug the shackle and report whether it gave way
    ///
    /// Implementations must return the actuator to its start position
    /// before returning, including when the sample could not be taken.
    fn probe(&mut self) -> Result<ProbeReport, ProbeError>;

    /// Move to the start position and stop driving the actuator
    fn park(&mut self) -> Result<(), ProbeError>;
}

impl<T: ShackleProbe + ?Sized> ShackleProbe for &mut T {
    fn probe(&mut self) -> Result<ProbeReport, ProbeError> {
        (**self).probe()
    }

    fn park(&mut self) -> Result<(), ProbeError> {
        (**self).park()
    }
}
