//! End-of-run screens and process exit codes

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use lockbreaker_core::config::{InputConfig, UiConfig};
use lockbreaker_core::orchestrator::RunReport;
use lockbreaker_core::state::{HaltReason, RunState};
use lockbreaker_core::traits::StatusDisplay;
use lockbreaker_drivers::input::Button;
use lockbreaker_hal::gpio::InputPin;

use crate::panel::Panel;
use crate::seed_input::wait_for_press;

/// Lock opened or every combination was tried
pub const EXIT_OK: u8 = 0;
/// Hardware or attempt log fault
pub const EXIT_FAULT: u8 = 1;
/// Dial slipped; the supervisor should restart the rig for a new seed
pub const EXIT_RESTART: u8 = 75;
/// Stopped by SIGINT/SIGTERM
pub const EXIT_INTERRUPTED: u8 = 130;

/// Process exit code for a finished run
pub fn exit_code(state: RunState) -> u8 {
    match state {
        RunState::Succeeded | RunState::Exhausted => EXIT_OK,
        RunState::Halted(HaltReason::Slip) => EXIT_RESTART,
        RunState::Halted(HaltReason::Interrupted) => EXIT_INTERRUPTED,
        RunState::Halted(HaltReason::ProbeFault | HaltReason::LogFault) => EXIT_FAULT,
        // Not reachable after a run; treat as a fault
        RunState::Idle | RunState::Dialing | RunState::Probing | RunState::AnomalyCheck => {
            EXIT_FAULT
        }
    }
}

/// Show the outcome and hold the screen until the operator is done with it
///
/// Success and exhaustion stay up until interrupted. A slip shows the last
/// combination tried and waits for a button press; only a press asks for a
/// restart, an interrupt while waiting exits as interrupted.
pub fn present<D, B>(
    panel: &mut Panel<D>,
    button: &mut Button<B>,
    report: &RunReport,
    ui: &UiConfig,
    input: &InputConfig,
    interrupt: &AtomicBool,
) -> u8
where
    D: StatusDisplay,
    B: InputPin,
{
    let last = report
        .last_tried
        .map(|combination| combination.to_string())
        .unwrap_or_else(|| "--".to_string());

    match report.state {
        RunState::Succeeded => {
            tracing::info!(combination = %last, "lock open");
            let period = Duration::from_millis(ui.success_blink_ms as u64);
            let mut lit = true;
            while !interrupt.load(Ordering::SeqCst) {
                let bottom = if lit { last.as_str() } else { "" };
                panel.show("Lock OPEN!", bottom);
                lit = !lit;
                thread::sleep(period);
            }
        }
        RunState::Exhausted => {
            tracing::info!(last = %last, "all combinations tried");
            panel.show("All Combos", "FAILED!");
            hold(interrupt, input.poll_ms);
        }
        RunState::Halted(HaltReason::Slip) => {
            tracing::warn!(last = %last, "dial slipped, restart required");
            panel.show("Slip Has", "OCCURED!");
            sleep_unless(interrupt, ui.slip_notice_ms);
            panel.show("Last Combo:", &last);
            if !wait_for_press(button, input.poll_ms, interrupt) {
                tracing::info!("interrupted at the slip screen");
                return EXIT_INTERRUPTED;
            }
            panel.show("Restarting...", "");
        }
        RunState::Halted(HaltReason::Interrupted) => {
            tracing::info!(last = %last, "run interrupted");
            panel.show("Stopped", &last);
        }
        RunState::Halted(reason) => {
            tracing::error!(%reason, last = %last, "run faulted");
            panel.show("FAULT:", &reason.to_string());
        }
        state => tracing::error!(%state, "run ended in a live state"),
    }

    exit_code(report.state)
}

fn hold(interrupt: &AtomicBool, poll_ms: u32) {
    let poll = Duration::from_millis(poll_ms.max(10) as u64);
    while !interrupt.load(Ordering::SeqCst) {
        thread::sleep(poll);
    }
}

fn sleep_unless(interrupt: &AtomicBool, ms: u32) {
    let deadline = std::time::Instant::now() + Duration::from_millis(ms as u64);
    while !interrupt.load(Ordering::SeqCst) && std::time::Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
}
