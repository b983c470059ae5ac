//! Servo shackle probe
//!
//! A hobby servo with its feedback potentiometer brought out to an ADC.
//! Probing swings the horn against the shackle, lets it sit, then reads
//! where the horn actually ended up: a shackle that gave way lets the horn
//! travel further than a locked one.
//!
//! Every servo command is followed by a travel wait, after which the pulse
//! train is stopped so the servo does not buzz against the shackle.

use embedded_hal::delay::DelayNs;
use lockbreaker_core::config::{ServoHwConfig, MAX_SERVO_ANGLE};
use lockbreaker_core::probe::ProbeClassifier;
use lockbreaker_core::traits::{FeedbackSensor, ProbeError, ProbeReport, ShackleProbe};
use lockbreaker_hal::pwm::PwmOutput;

/// Servo-driven shackle probe
pub struct ShackleServo<PWM, S, D> {
    pwm: PWM,
    sensor: S,
    delay: D,
    config: ServoHwConfig,
    classifier: ProbeClassifier,
}

impl<PWM, S, D> ShackleServo<PWM, S, D>
where
    PWM: PwmOutput,
    S: FeedbackSensor,
    D: DelayNs,
{
    /// Create a probe; the servo is not moved until the first command
    pub fn new(
        pwm: PWM,
        sensor: S,
        delay: D,
        config: ServoHwConfig,
        classifier: ProbeClassifier,
    ) -> Self {
        Self {
            pwm,
            sensor,
            delay,
            config,
            classifier,
        }
    }

    /// Duty (per-mille) for `angle`, interpolated between the calibration points
    pub fn duty_for_angle(&self, angle: u16) -> u16 {
        let angle = angle.min(MAX_SERVO_ANGLE) as i32;
        let [d0, d90, d180] = self.config.duty_x10.map(|d| d as i32);
        let duty = if angle <= 90 {
            d0 + (d90 - d0) * angle / 90
        } else {
            d90 + (d180 - d90) * (angle - 90) / 90
        };
        duty.max(0) as u16
    }

    /// Swing to `angle`, wait for the travel, then stop pulsing
    pub fn move_to(&mut self, angle: u16) -> Result<(), ProbeError> {
        let duty = self.duty_for_angle(angle);
        tracing::trace!(angle, duty, "servo command");
        self.pwm
            .set_duty_x10(duty)
            .map_err(|_| ProbeError::Actuator)?;
        self.delay.delay_ms(self.config.travel_ms);
        self.pwm.disable().map_err(|_| ProbeError::Actuator)
    }

    /// Release the hardware
    pub fn release(self) -> (PWM, S) {
        (self.pwm, self.sensor)
    }
}

impl<PWM, S, D> ShackleProbe for ShackleServo<PWM, S, D>
where
    PWM: PwmOutput,
    S: FeedbackSensor,
    D: DelayNs,
{
    fn probe(&mut self) -> Result<ProbeReport, ProbeError> {
        let sample = self.move_to(self.config.move_angle).and_then(|()| {
            self.delay.delay_ms(self.config.hold_ms);
            self.sensor.read_raw().map_err(ProbeError::from)
        });

        // Back to start whatever happened above
        let returned = self.move_to(self.config.start_angle);
        let raw = sample?;
        returned?;

        let (reading, outcome) = self.classifier.evaluate(raw);
        tracing::debug!(raw, %reading, ?outcome, "shackle probe");
        Ok(ProbeReport { reading, outcome })
    }

    fn park(&mut self) -> Result<(), ProbeError> {
        self.move_to(self.config.start_angle)
    }
}
