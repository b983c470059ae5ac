//! Append-only attempt log

use crate::dial::Combination;
use crate::probe::ProbeOutcome;

/// Errors that can occur recording an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogError {
    /// The record could not be written durably
    WriteFailed,
}

/// Durable record of every combination tried
///
/// Records are written once and never rewritten. The sink stamps each
/// record with the wall-clock time it was appended.
pub trait AttemptLog {
    /// Append one attempt and its outcome
    fn append(&mut self, combination: Combination, outcome: ProbeOutcome) -> Result<(), LogError>;
}

impl<T: AttemptLog + ?Sized> AttemptLog for &mut T {
    fn append(&mut self, combination: Combination, outcome: ProbeOutcome) -> Result<(), LogError> {
        (**self).append(combination, outcome)
    }
}
