//! Dial orchestrator
//!
//! Runs the brute-force loop: dial the current combination, probe the
//! shackle, record the outcome, then either stop or move on. Every step is
//! expressed as an [`Event`] fed through [`RunState::transition`], so the
//! state machine stays the single source of truth for what happens next.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;

use super::observer::{RunNotice, RunObserver, RunReport};
use crate::config::SettleConfig;
use crate::dial::{Combination, DialGeometry, Enumerator, PositionTracker};
use crate::state::{Event, HaltReason, RunState};
use crate::traits::{AttemptLog, ShackleProbe, SlipCheck, StepperDriver};

/// Hardware and collaborators driven by the orchestrator
pub struct Rig<S, P, L, C, D> {
    /// Dial stepper
    pub stepper: S,
    /// Shackle probe
    pub probe: P,
    /// Attempt log sink
    pub log: L,
    /// Periodic slip check
    pub slip: C,
    /// Settle delay provider
    pub delay: D,
}

/// Brute-force run controller
///
/// Owns the dial position and the run state for the lifetime of one run.
/// A run starts exactly once; a finished orchestrator only reports.
pub struct Orchestrator<S, P, L, C, D, O = ()> {
    rig: Rig<S, P, L, C, D>,
    observer: O,
    tracker: PositionTracker,
    settle: SettleConfig,
    state: RunState,
    last_tried: Option<Combination>,
    attempts: u32,
    anomaly_checks: u32,
}

impl<S, P, L, C, D> Orchestrator<S, P, L, C, D>
where
    S: StepperDriver,
    P: ShackleProbe,
    L: AttemptLog,
    C: SlipCheck,
    D: DelayNs,
{
    /// Create an idle orchestrator with the dial at home
    pub fn new(rig: Rig<S, P, L, C, D>, geometry: DialGeometry, settle: SettleConfig) -> Self {
        Self {
            rig,
            observer: (),
            tracker: PositionTracker::new(geometry),
            settle,
            state: RunState::Idle,
            last_tried: None,
            attempts: 0,
            anomaly_checks: 0,
        }
    }

    /// Attach an observer for progress notices
    pub fn with_observer<O: RunObserver>(self, observer: O) -> Orchestrator<S, P, L, C, D, O> {
        Orchestrator {
            rig: self.rig,
            observer,
            tracker: self.tracker,
            settle: self.settle,
            state: self.state,
            last_tried: self.last_tried,
            attempts: self.attempts,
            anomaly_checks: self.anomaly_checks,
        }
    }
}

impl<S, P, L, C, D, O> Orchestrator<S, P, L, C, D, O>
where
    S: StepperDriver,
    P: ShackleProbe,
    L: AttemptLog,
    C: SlipCheck,
    D: DelayNs,
    O: RunObserver,
{
    /// Current run state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Dial position tracker
    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    /// Snapshot of the run so far
    pub fn report(&self) -> RunReport {
        RunReport {
            state: self.state,
            last_tried: self.last_tried,
            attempts: self.attempts,
            anomaly_checks: self.anomaly_checks,
        }
    }

    /// Give the hardware back
    pub fn into_rig(self) -> Rig<S, P, L, C, D> {
        self.rig
    }

    /// Run from `seed` until a terminal state is reached
    ///
    /// `interrupt` is checked between attempts only; a dial move that has
    /// started always completes. Actuators are released before returning.
    pub fn run(&mut self, seed: Combination, interrupt: &AtomicBool) -> RunReport {
        if self.state != RunState::Idle {
            tracing::warn!(state = %self.state, "run already started");
            return self.report();
        }

        tracing::info!(%seed, "starting run");
        self.rig.stepper.enable(true);
        self.apply(Event::SeedConfirmed);

        let mut enumerator = Enumerator::start(seed);
        while !self.state.is_terminal() {
            if interrupt.load(Ordering::SeqCst) {
                self.apply(Event::Interrupted);
                break;
            }
            let Some(combination) = enumerator.next() else {
                self.apply(Event::EnumerationExhausted);
                break;
            };
            self.attempt(combination, &enumerator);
        }

        self.finish();
        self.report()
    }

    /// Dial, probe, record, and classify one combination
    fn attempt(&mut self, combination: Combination, enumerator: &Enumerator) {
        self.observer.notice(RunNotice::Trying {
            combination,
            attempt: self.attempts + 1,
        });

        self.dial(combination);

        let report = match self.rig.probe.probe() {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(%combination, error = ?e, "shackle probe failed");
                self.apply(Event::Fault(HaltReason::ProbeFault));
                return;
            }
        };
        tracing::debug!(%combination, reading = %report.reading, "probe reading");

        if let Err(e) = self.rig.log.append(combination, report.outcome) {
            tracing::error!(%combination, error = ?e, "attempt could not be recorded");
            self.apply(Event::Fault(HaltReason::LogFault));
            return;
        }
        self.attempts += 1;
        self.last_tried = Some(combination);
        tracing::info!(%combination, outcome = ?report.outcome, attempt = self.attempts, "attempt");

        let event = if report.outcome.is_open() {
            Event::ProbeOpen
        } else if combination.is_inner_cycle_start() {
            Event::CheckpointReached
        } else if enumerator.peek().is_none() {
            Event::EnumerationExhausted
        } else {
            Event::ProbeClosed
        };
        self.apply(event);

        if self.state == RunState::AnomalyCheck {
            self.anomaly_checks += 1;
            let event = if self.rig.slip.anomaly_detected() {
                tracing::error!(%combination, "dial slip detected");
                Event::AnomalyDetected
            } else {
                Event::NoAnomaly
            };
            self.apply(event);
        }
    }

    /// Turn the dial onto `combination`, settling after every move
    fn dial(&mut self, combination: Combination) {
        let plan = self.tracker.plan(combination);
        tracing::debug!(
            %combination,
            to_first = plan.to_first.steps,
            to_second = plan.to_second.steps,
            to_third = plan.to_third.steps,
            "dial plan"
        );

        for (mv, settle_ms) in plan.moves().into_iter().zip(self.settle.after_moves()) {
            self.tracker.execute(&mut self.rig.stepper, mv);
            self.rig.delay.delay_ms(settle_ms);
        }
        self.rig.delay.delay_ms(self.settle.before_probe_ms);
        self.apply(Event::DialComplete);
    }

    /// Release the actuators and announce the terminal state
    fn finish(&mut self) {
        if let Err(e) = self.rig.probe.park() {
            tracing::warn!(error = ?e, "shackle servo did not park");
        }
        self.rig.stepper.enable(false);

        let notice = match (self.state, self.last_tried) {
            (RunState::Succeeded, Some(c)) => RunNotice::Opened(c),
            (RunState::Exhausted, Some(c)) => RunNotice::Exhausted(c),
            (RunState::Halted(HaltReason::Slip), Some(c)) => RunNotice::SlipDetected(c),
            (RunState::Halted(HaltReason::Interrupted), _) => RunNotice::Interrupted,
            (RunState::Halted(reason), _) => RunNotice::Faulted(reason),
            _ => return,
        };

        match self.state {
            RunState::Halted(_) => {
                tracing::error!(state = %self.state, attempts = self.attempts, "run halted")
            }
            _ => tracing::info!(state = %self.state, attempts = self.attempts, "run finished"),
        }
        self.observer.notice(notice);
    }

    fn apply(&mut self, event: Event) {
        let next = self.state.transition(event);
        if next != self.state {
            tracing::trace!(from = %self.state, to = %next, ?event, "run state");
        }
        self.state = next;
    }
}
