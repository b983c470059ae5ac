//! Step/dir stepper driver
//!
//! Bit-bangs an A4988/DRV8825-style driver: one pin selects the direction,
//! each high/low pulse on the step pin advances one (micro)step.

use embedded_hal::delay::DelayNs;
use lockbreaker_core::config::StepperHwConfig;
use lockbreaker_core::traits::{Direction, StepperDriver};
use lockbreaker_hal::gpio::OutputPin;

/// Step/dir stepper
pub struct StepDirStepper<STEP, DIR, EN, D> {
    step: STEP,
    dir: DIR,
    enable: EN,
    delay: D,
    config: StepperHwConfig,
    enabled: bool,
}

impl<STEP, DIR, EN, D> StepDirStepper<STEP, DIR, EN, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    D: DelayNs,
{
    /// Create a new stepper; the driver starts released
    pub fn new(step: STEP, dir: DIR, enable: EN, delay: D, config: StepperHwConfig) -> Self {
        let mut stepper = Self {
            step,
            dir,
            enable,
            delay,
            config,
            enabled: false,
        };
        stepper.step.set_low();
        stepper.enable(false);
        stepper
    }

    /// Release the pins
    pub fn release(self) -> (STEP, DIR, EN) {
        (self.step, self.dir, self.enable)
    }
}

impl<STEP, DIR, EN, D> StepperDriver for StepDirStepper<STEP, DIR, EN, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    D: DelayNs,
{
    fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
        // Active-low: enabled = low
        self.enable
            .set_state(enabled != self.config.enable_active_low);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn step(&mut self, direction: Direction, steps: u32) {
        if steps == 0 {
            return;
        }

        let clockwise = direction == Direction::Clockwise;
        self.dir.set_state(clockwise == self.config.clockwise_high);

        let half_period = self.config.pulse_half_period_us;
        for _ in 0..steps {
            self.step.set_high();
            self.delay.delay_us(half_period);
            self.step.set_low();
            self.delay.delay_us(half_period);
        }
    }
}
