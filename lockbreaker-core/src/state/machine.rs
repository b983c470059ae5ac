//! Run state machine
//!
//! All orchestrator behavior is a function of the current state and an
//! event. Terminal states absorb every event; a fresh process is the only
//! way out of them.

use core::fmt;

use super::events::Event;

/// Orchestrator lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Waiting for the seed combination
    Idle,
    /// Turning the dial to the current combination
    Dialing,
    /// Tugging the shackle
    Probing,
    /// Waiting on the external slip check
    AnomalyCheck,
    /// Stopped before finding the code
    Halted(HaltReason),
    /// The shackle opened
    Succeeded,
    /// Every combination from the seed on was tried
    Exhausted,
}

/// Why a run halted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// Slip check reported the dial slipped
    Slip,
    /// Operator interrupt
    Interrupted,
    /// Shackle probe hardware failed
    ProbeFault,
    /// Attempt could not be recorded
    LogFault,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            HaltReason::Slip => "dial slip",
            HaltReason::Interrupted => "interrupted",
            HaltReason::ProbeFault => "probe fault",
            HaltReason::LogFault => "attempt log fault",
        };
        f.write_str(text)
    }
}

impl RunState {
    /// Check if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Halted(_) | RunState::Succeeded | RunState::Exhausted
        )
    }

    /// Process an event and return the next state
    ///
    /// This is the core state transition logic.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use RunState::*;

        match (self, event) {
            // Terminal states absorb everything
            (Halted(_) | Succeeded | Exhausted, _) => self,

            // Stop events apply from any live state
            (_, Interrupted) => Halted(HaltReason::Interrupted),
            (_, Fault(reason)) => Halted(reason),

            // Idle transitions
            (Idle, SeedConfirmed) => Dialing,

            // Dialing transitions
            (Dialing, DialComplete) => Probing,

            // Probing transitions
            (Probing, ProbeOpen) => Succeeded,
            (Probing, CheckpointReached) => AnomalyCheck,
            (Probing, ProbeClosed) => Dialing,
            (Probing, EnumerationExhausted) => Exhausted,

            // AnomalyCheck transitions
            (AnomalyCheck, NoAnomaly) => Dialing,
            (AnomalyCheck, AnomalyDetected) => Halted(HaltReason::Slip),

            // Default: stay in current state
            _ => self,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => f.write_str("idle"),
            RunState::Dialing => f.write_str("dialing"),
            RunState::Probing => f.write_str("probing"),
            RunState::AnomalyCheck => f.write_str("anomaly check"),
            RunState::Halted(reason) => write!(f, "halted ({})", reason),
            RunState::Succeeded => f.write_str("succeeded"),
            RunState::Exhausted => f.write_str("exhausted"),
        }
    }
}
