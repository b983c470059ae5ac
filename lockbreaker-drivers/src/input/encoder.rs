//! Rotary encoder handler
//!
//! Detent-type encoders (KY-040 and friends) pulse CLK once per click. On
//! the falling edge of CLK, DT tells the direction: high for a clockwise
//! click, low for counter-clockwise. The decoder keeps the last CLK level
//! explicitly so it can be driven from a plain polling loop.

use lockbreaker_hal::gpio::InputPin;

/// Edge detector for the CLK/DT pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetentDecoder {
    last_clk: bool,
}

impl DetentDecoder {
    /// Create a decoder seeded with the current CLK level
    pub const fn new(clk: bool) -> Self {
        Self { last_clk: clk }
    }

    /// Feed one sample; returns +1, -1, or 0
    pub fn update(&mut self, clk: bool, dt: bool) -> i8 {
        let falling = self.last_clk && !clk;
        self.last_clk = clk;
        match (falling, dt) {
            (true, true) => 1,
            (true, false) => -1,
            (false, _) => 0,
        }
    }
}

/// Rotary encoder on two input pins
pub struct RotaryEncoder<CLK, DT> {
    clk: CLK,
    dt: DT,
    decoder: DetentDecoder,
}

impl<CLK: InputPin, DT: InputPin> RotaryEncoder<CLK, DT> {
    /// Create a new encoder handler
    pub fn new(clk: CLK, dt: DT) -> Self {
        let decoder = DetentDecoder::new(clk.is_high());
        Self { clk, dt, decoder }
    }

    /// Poll for a detent
    ///
    /// Should be called every millisecond or so.
    pub fn poll(&mut self) -> i8 {
        let clk = self.clk.is_high();
        // DT only matters on a CLK edge, but sampling it every time keeps
        // the two reads close together.
        let dt = self.dt.is_high();
        self.decoder.update(clk, dt)
    }
}
