//! PWM output abstraction
//!
//! Hobby servos take a 50 Hz pulse train whose duty cycle selects the
//! commanded angle. The frequency is fixed when the output is created;
//! only the duty cycle changes at runtime.

/// Pulse-width modulated output
pub trait PwmOutput {
    /// Error type for PWM operations
    type Error;

    /// Set the duty cycle in tenths of a percent (0-1000)
    ///
    /// Values above 1000 are clamped by the implementation.
    fn set_duty_x10(&mut self, duty_x10: u16) -> Result<(), Self::Error>;

    /// Stop the pulse train and drive the pin low
    ///
    /// A servo with no pulses stops holding torque, which keeps it from
    /// buzzing against the shackle between probes.
    fn disable(&mut self) -> Result<(), Self::Error>;
}

/// Maximum duty cycle value accepted by [`PwmOutput::set_duty_x10`]
pub const MAX_DUTY_X10: u16 = 1000;
