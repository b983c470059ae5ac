//! GPIO pins

use lockbreaker_hal::gpio::{InputPin, OutputPin};

/// Push-pull output
pub struct RpiOutput {
    pin: rppal::gpio::OutputPin,
}

impl RpiOutput {
    pub(crate) fn new(pin: rppal::gpio::OutputPin) -> Self {
        Self { pin }
    }

    /// BCM pin number
    pub fn pin(&self) -> u8 {
        self.pin.pin()
    }
}

impl OutputPin for RpiOutput {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Input with the internal pull-up enabled
pub struct RpiInput {
    pin: rppal::gpio::InputPin,
}

impl RpiInput {
    pub(crate) fn new(pin: rppal::gpio::InputPin) -> Self {
        Self { pin }
    }

    /// BCM pin number
    pub fn pin(&self) -> u8 {
        self.pin.pin()
    }
}

impl InputPin for RpiInput {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
