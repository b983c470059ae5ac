//! Operator panel: the 16x2 display and the seed being entered
//!
//! The panel is shared between the encoder loop and the button thread
//! behind one mutex; every display write happens under it. Display errors
//! never stop the rig. They are logged and the screen is left as it was.

use std::sync::{Arc, Mutex, MutexGuard};

use lockbreaker_core::dial::Combination;
use lockbreaker_core::orchestrator::{RunNotice, RunObserver};
use lockbreaker_core::seed::InputBuffer;
use lockbreaker_core::traits::StatusDisplay;
use lockbreaker_drivers::input::ButtonEvent;

const ENTRY_TITLE: &str = "Input Starting";

/// Display plus seed entry state
pub struct Panel<D> {
    display: D,
    buffer: InputBuffer,
    shown: Option<(String, String)>,
}

impl<D: StatusDisplay> Panel<D> {
    /// Wrap a display with an empty entry buffer at 00-00-00
    pub fn new(display: D) -> Self {
        Self {
            display,
            buffer: InputBuffer::new(),
            shown: None,
        }
    }

    /// Pre-fill the entry screen
    pub fn with_seed(mut self, seed: Combination) -> Self {
        self.buffer = InputBuffer::starting_at(seed);
        self
    }

    /// Seed entry still in progress
    pub fn is_entering(&self) -> bool {
        self.buffer.is_active()
    }

    /// Encoder detents turn the digit under the cursor
    pub fn on_rotate(&mut self, detents: i8) {
        self.buffer.rotate(detents);
    }

    /// Short press moves right (confirming on the last digit), long press moves left
    pub fn on_button(&mut self, event: ButtonEvent) -> Option<Combination> {
        match event {
            ButtonEvent::ShortPress => self.buffer.advance(),
            ButtonEvent::LongPress => {
                self.buffer.back();
                None
            }
        }
    }

    /// Redraw the entry screen; `blink` blanks the digit being edited
    pub fn draw_entry(&mut self, blink: bool) {
        let line = self.buffer.render(blink);
        self.show(ENTRY_TITLE, &line);
    }

    /// Show the confirmed seed
    pub fn announce_seed(&mut self, seed: Combination) {
        self.show("Final Code:", &seed.to_string());
    }

    /// Put two lines on the display, skipping the write if nothing changed
    pub fn show(&mut self, top: &str, bottom: &str) {
        if let Some((shown_top, shown_bottom)) = &self.shown {
            if shown_top == top && shown_bottom == bottom {
                return;
            }
        }
        match self.display.show(top, bottom) {
            Ok(()) => self.shown = Some((top.to_string(), bottom.to_string())),
            Err(e) => {
                tracing::warn!(?e, top, bottom, "display write failed");
                self.shown = None;
            }
        }
    }

    #[cfg(test)]
    pub fn into_display(self) -> D {
        self.display
    }
}

impl<D: StatusDisplay> RunObserver for Panel<D> {
    fn notice(&mut self, notice: RunNotice) {
        if let RunNotice::Trying { combination, .. } = notice {
            self.show("Trying Combo...", &combination.to_string());
        }
    }
}

/// Panel shared between threads
pub type SharedPanel<D> = Arc<Mutex<Panel<D>>>;

/// Lock the panel, recovering it if a holder panicked
pub fn lock_panel<D>(panel: &Mutex<Panel<D>>) -> MutexGuard<'_, Panel<D>> {
    panel.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Forwards run notices to a shared panel
pub struct PanelObserver<D>(pub SharedPanel<D>);

impl<D: StatusDisplay> RunObserver for PanelObserver<D> {
    fn notice(&mut self, notice: RunNotice) {
        lock_panel(&self.0).notice(notice);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lockbreaker_core::traits::DisplayError;

    /// Display that records every line written
    #[derive(Default)]
    pub(crate) struct MockDisplay {
        pub rows: [String; 2],
        pub writes: usize,
        pub fail: bool,
    }

    impl StatusDisplay for MockDisplay {
        fn clear(&mut self) -> Result<(), DisplayError> {
            self.rows = Default::default();
            Ok(())
        }

        fn write_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Bus);
            }
            let slot = self.rows.get_mut(row as usize).ok_or(DisplayError::InvalidRow)?;
            *slot = text.to_string();
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_entry_screen() {
        let mut panel = Panel::new(MockDisplay::default());
        panel.on_rotate(7);
        panel.draw_entry(false);
        let display = panel.into_display();
        assert_eq!(display.rows[0], "Input Starting");
        assert_eq!(display.rows[1], "Combo: 07-00-00");
    }

    #[test]
    fn test_blink_blanks_edited_digit() {
        let mut panel = Panel::new(MockDisplay::default());
        assert_eq!(panel.on_button(ButtonEvent::ShortPress), None);
        panel.draw_entry(true);
        assert_eq!(panel.into_display().rows[1], "Combo: 00-  -00");
    }

    #[test]
    fn test_unchanged_screen_not_rewritten() {
        let mut panel = Panel::new(MockDisplay::default());
        panel.draw_entry(false);
        panel.draw_entry(false);
        assert_eq!(panel.into_display().writes, 2);
    }

    #[test]
    fn test_long_press_moves_left() {
        let mut panel = Panel::new(MockDisplay::default());
        panel.on_button(ButtonEvent::ShortPress);
        panel.on_button(ButtonEvent::LongPress);
        panel.on_rotate(3);
        assert_eq!(panel.on_button(ButtonEvent::ShortPress), None);
        assert_eq!(panel.on_button(ButtonEvent::ShortPress), None);
        let seed = panel.on_button(ButtonEvent::ShortPress);
        assert_eq!(seed, Some(Combination::new(3, 0, 0).unwrap()));
        assert!(!panel.is_entering());
    }

    #[test]
    fn test_prefilled_seed() {
        let seed = Combination::new(12, 34, 5).unwrap();
        let mut panel = Panel::new(MockDisplay::default()).with_seed(seed);
        panel.draw_entry(false);
        assert_eq!(panel.into_display().rows[1], "Combo: 12-34-05");
    }

    #[test]
    fn test_trying_notice() {
        let mut panel = Panel::new(MockDisplay::default());
        panel.notice(RunNotice::Trying {
            combination: Combination::new(1, 2, 3).unwrap(),
            attempt: 1,
        });
        let display = panel.into_display();
        assert_eq!(display.rows[0], "Trying Combo...");
        assert_eq!(display.rows[1], "01-02-03");
    }

    #[test]
    fn test_observer_survives_poisoned_lock() {
        let shared = Arc::new(Mutex::new(Panel::new(MockDisplay::default())));
        let poisoner = Arc::clone(&shared);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("display thread died");
        })
        .join();
        assert!(shared.is_poisoned());

        let mut observer = PanelObserver(Arc::clone(&shared));
        observer.notice(RunNotice::Trying {
            combination: Combination::new(4, 5, 6).unwrap(),
            attempt: 7,
        });
        assert_eq!(lock_panel(&shared).display.rows[1], "04-05-06");
    }

    #[test]
    fn test_display_failure_is_retried() {
        let mut panel = Panel::new(MockDisplay {
            fail: true,
            ..Default::default()
        });
        panel.show("Lock OPEN!", "01-02-03");
        panel.display.fail = false;
        panel.show("Lock OPEN!", "01-02-03");
        assert_eq!(panel.into_display().rows[0], "Lock OPEN!");
    }
}
