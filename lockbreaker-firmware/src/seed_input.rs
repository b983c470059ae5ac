//! Seed entry and hand-off to the run
//!
//! The calling thread polls the encoder and redraws the entry screen with
//! the edited digit blinking. A button thread classifies presses; once the
//! last digit is confirmed it shows the seed and runs the dial on that same
//! thread. After the hand-off the encoder loop stops touching the buffer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use lockbreaker_core::config::InputConfig;
use lockbreaker_core::dial::Combination;
use lockbreaker_core::traits::StatusDisplay;
use lockbreaker_drivers::input::{Button, RotaryEncoder};
use lockbreaker_hal::gpio::InputPin;

use crate::panel::{lock_panel, SharedPanel};

/// Outcome of the entry phase
pub struct Handoff<R, B> {
    /// Run result, or `None` if interrupted before a seed was confirmed
    pub result: Option<R>,
    /// Button handed back for the end-of-run screens
    pub button: Button<B>,
}

/// Run the entry screen, then `run` with the confirmed seed
///
/// Blocks until the button thread has finished, which includes the whole
/// run when a seed was confirmed.
pub fn enter_and_run<D, CLK, DT, B, F, R>(
    panel: SharedPanel<D>,
    mut encoder: RotaryEncoder<CLK, DT>,
    button: Button<B>,
    input: InputConfig,
    interrupt: Arc<AtomicBool>,
    run: F,
) -> anyhow::Result<Handoff<R, B>>
where
    D: StatusDisplay + Send + 'static,
    CLK: InputPin,
    DT: InputPin,
    B: InputPin + Send + 'static,
    F: FnOnce(Combination, &AtomicBool) -> R + Send + 'static,
    R: Send + 'static,
{
    let worker = {
        let panel = Arc::clone(&panel);
        let interrupt = Arc::clone(&interrupt);
        thread::Builder::new()
            .name("button".into())
            .spawn(move || button_thread(panel, button, input, interrupt, run))?
    };

    tracing::info!("waiting for seed entry");
    let started = Instant::now();
    let poll = Duration::from_millis(input.poll_ms as u64);
    let blink_ms = input.blink_ms as u64;
    while !interrupt.load(Ordering::SeqCst) {
        let detents = encoder.poll();
        {
            let mut panel = lock_panel(&panel);
            if !panel.is_entering() {
                break;
            }
            panel.on_rotate(detents);
            let blink = (started.elapsed().as_millis() as u64 / blink_ms) % 2 == 1;
            panel.draw_entry(blink);
        }
        thread::sleep(poll);
    }

    worker
        .join()
        .map_err(|_| anyhow!("button thread panicked"))
}

fn button_thread<D, B, F, R>(
    panel: SharedPanel<D>,
    mut button: Button<B>,
    input: InputConfig,
    interrupt: Arc<AtomicBool>,
    run: F,
) -> Handoff<R, B>
where
    D: StatusDisplay,
    B: InputPin,
    F: FnOnce(Combination, &AtomicBool) -> R,
{
    let started = Instant::now();
    let poll = Duration::from_millis(input.poll_ms as u64);

    let seed = loop {
        if interrupt.load(Ordering::SeqCst) {
            tracing::info!("seed entry interrupted");
            return Handoff {
                result: None,
                button,
            };
        }
        if let Some(event) = button.poll(started.elapsed().as_millis() as u64) {
            tracing::debug!(?event, "button");
            let mut panel = lock_panel(&panel);
            if let Some(seed) = panel.on_button(event) {
                panel.announce_seed(seed);
                break seed;
            }
        }
        thread::sleep(poll);
    };

    thread::sleep(Duration::from_millis(input.confirm_ms as u64));
    let result = run(seed, &interrupt);
    Handoff {
        result: Some(result),
        button,
    }
}

/// Block until the button is pressed and released, or `interrupt` is raised
///
/// Returns true on a press.
pub fn wait_for_press<B: InputPin>(
    button: &mut Button<B>,
    poll_ms: u32,
    interrupt: &AtomicBool,
) -> bool {
    let started = Instant::now();
    let poll = Duration::from_millis(poll_ms as u64);
    while !interrupt.load(Ordering::SeqCst) {
        if button.poll(started.elapsed().as_millis() as u64).is_some() {
            return true;
        }
        thread::sleep(poll);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::Mutex;

    use crate::panel::tests::MockDisplay;
    use crate::panel::Panel;

    /// Pin that reads a fixed level
    struct Level(bool);

    impl InputPin for Level {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    /// Active-low button pin pressed on every other sample
    #[derive(Default)]
    struct Tapping {
        samples: Cell<u32>,
    }

    impl InputPin for Tapping {
        fn is_high(&self) -> bool {
            let n = self.samples.get();
            self.samples.set(n + 1);
            n % 2 == 1
        }
    }

    fn input() -> InputConfig {
        InputConfig {
            poll_ms: 1,
            confirm_ms: 1,
            ..InputConfig::default()
        }
    }

    #[test]
    fn test_three_short_presses_hand_off_seed() {
        let seed = Combination::new(5, 6, 7).unwrap();
        let panel = Arc::new(Mutex::new(Panel::new(MockDisplay::default()).with_seed(seed)));
        let encoder = RotaryEncoder::new(Level(true), Level(true));
        let button = Button::new(Tapping::default(), 1500, 0);
        let interrupt = Arc::new(AtomicBool::new(false));

        let handoff = enter_and_run(
            Arc::clone(&panel),
            encoder,
            button,
            input(),
            interrupt,
            |seed, _interrupt| seed,
        )
        .unwrap();

        assert_eq!(handoff.result, Some(seed));
        let panel = lock_panel(&panel);
        assert!(!panel.is_entering());
    }

    #[test]
    fn test_interrupt_abandons_entry() {
        let panel = Arc::new(Mutex::new(Panel::new(MockDisplay::default())));
        let encoder = RotaryEncoder::new(Level(true), Level(true));
        let button = Button::new(Level(true), 1500, 0);
        let interrupt = Arc::new(AtomicBool::new(true));

        let handoff = enter_and_run(
            Arc::clone(&panel),
            encoder,
            button,
            input(),
            interrupt,
            |seed, _interrupt| seed,
        )
        .unwrap();

        assert_eq!(handoff.result, None);
        assert!(lock_panel(&panel).is_entering());
    }

    #[test]
    fn test_wait_for_press() {
        let mut button = Button::new(Tapping::default(), 1500, 0);
        assert!(wait_for_press(&mut button, 1, &AtomicBool::new(false)));

        let mut idle = Button::new(Level(true), 1500, 0);
        assert!(!wait_for_press(&mut idle, 1, &AtomicBool::new(true)));
    }
}
