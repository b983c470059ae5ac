//! Run progress notifications and the final report

use crate::dial::Combination;
use crate::state::{HaltReason, RunState};

/// Progress notice emitted by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunNotice {
    /// About to dial `combination`; `attempt` counts from 1
    Trying {
        /// Combination being dialed
        combination: Combination,
        /// Attempt number within this run
        attempt: u32,
    },
    /// The shackle opened on `combination`
    Opened(Combination),
    /// The slip check fired after `combination`
    SlipDetected(Combination),
    /// Nothing left to try; `last` was the final combination
    Exhausted(Combination),
    /// Operator interrupt honoured between attempts
    Interrupted,
    /// Run stopped on a hardware or log fault
    Faulted(HaltReason),
}

/// Receiver of run notices, typically the status display
pub trait RunObserver {
    /// Called synchronously from the run loop
    fn notice(&mut self, notice: RunNotice);
}

impl RunObserver for () {
    fn notice(&mut self, _notice: RunNotice) {}
}

impl<T: RunObserver + ?Sized> RunObserver for &mut T {
    fn notice(&mut self, notice: RunNotice) {
        (**self).notice(notice)
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Terminal state reached
    pub state: RunState,
    /// Last combination recorded in the attempt log
    pub last_tried: Option<Combination>,
    /// Attempts recorded
    pub attempts: u32,
    /// Slip checks performed
    pub anomaly_checks: u32,
}
