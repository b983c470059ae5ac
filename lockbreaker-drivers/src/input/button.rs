//! Push button with short/long press classification
//!
//! Contact bounce is filtered first: a level only counts once it has held
//! for the debounce time. Presses are classified on the filtered level.

use lockbreaker_hal::gpio::InputPin;

/// Classified press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Released before the long-press time
    ShortPress,
    /// Held for the long-press time (fires once, while still held)
    LongPress,
}

/// Press classifier over a sampled "pressed" level
#[derive(Debug, Clone, Copy)]
pub struct ButtonClassifier {
    long_press_ms: u64,
    debounce_ms: u64,
    raw: bool,
    raw_since: u64,
    stable: bool,
    pressed_at: Option<u64>,
    long_fired: bool,
}

impl ButtonClassifier {
    /// Create a classifier; a level change is accepted after `debounce_ms`
    pub const fn new(long_press_ms: u32, debounce_ms: u32) -> Self {
        Self {
            long_press_ms: long_press_ms as u64,
            debounce_ms: debounce_ms as u64,
            raw: false,
            raw_since: 0,
            stable: false,
            pressed_at: None,
            long_fired: false,
        }
    }

    /// Button is currently down
    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// Feed one sample taken at `now_ms` (monotonic)
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> Option<ButtonEvent> {
        if pressed != self.raw {
            self.raw = pressed;
            self.raw_since = now_ms;
        }
        if self.raw != self.stable && now_ms.saturating_sub(self.raw_since) >= self.debounce_ms {
            self.stable = self.raw;
        }

        match (self.pressed_at, self.stable) {
            (None, true) => {
                self.pressed_at = Some(now_ms);
                self.long_fired = false;
                None
            }
            (Some(start), true) => {
                if !self.long_fired && now_ms.saturating_sub(start) >= self.long_press_ms {
                    self.long_fired = true;
                    Some(ButtonEvent::LongPress)
                } else {
                    None
                }
            }
            (Some(_), false) => {
                self.pressed_at = None;
                (!self.long_fired).then_some(ButtonEvent::ShortPress)
            }
            (None, false) => None,
        }
    }
}

/// Active-low push button on an input pin (pull-up enabled)
pub struct Button<P> {
    pin: P,
    classifier: ButtonClassifier,
}

impl<P: InputPin> Button<P> {
    /// Create a new button
    pub fn new(pin: P, long_press_ms: u32, debounce_ms: u32) -> Self {
        Self {
            pin,
            classifier: ButtonClassifier::new(long_press_ms, debounce_ms),
        }
    }

    /// Sample the pin and classify
    pub fn poll(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        let pressed = self.pin.is_low();
        self.classifier.update(pressed, now_ms)
    }

    /// Button is currently down
    pub fn is_pressed(&self) -> bool {
        self.classifier.is_pressed()
    }
}
