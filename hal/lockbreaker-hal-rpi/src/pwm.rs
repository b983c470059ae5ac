//! Software PWM on a GPIO pin
//!
//! rppal generates the pulse train from a background thread. Jitter is in
//! the tens of microseconds, fine for a hobby servo that is only ever
//! commanded to one of a few fixed angles.

use lockbreaker_hal::pwm::{PwmOutput, MAX_DUTY_X10};

/// Servo PWM output
pub struct RpiPwm {
    pin: rppal::gpio::OutputPin,
    frequency_hz: f64,
}

impl RpiPwm {
    pub(crate) fn new(mut pin: rppal::gpio::OutputPin, frequency_hz: u16) -> Self {
        pin.set_low();
        Self {
            pin,
            frequency_hz: frequency_hz as f64,
        }
    }
}

/// Duty per-mille as the fraction rppal expects
pub(crate) fn duty_fraction(duty_x10: u16) -> f64 {
    duty_x10.min(MAX_DUTY_X10) as f64 / MAX_DUTY_X10 as f64
}

impl PwmOutput for RpiPwm {
    type Error = rppal::gpio::Error;

    fn set_duty_x10(&mut self, duty_x10: u16) -> Result<(), Self::Error> {
        self.pin
            .set_pwm_frequency(self.frequency_hz, duty_fraction(duty_x10))
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        self.pin.clear_pwm()?;
        self.pin.set_low();
        Ok(())
    }
}
