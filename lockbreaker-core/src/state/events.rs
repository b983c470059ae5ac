//! Events that trigger run state transitions

use super::machine::HaltReason;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Hand-off events
    /// Operator confirmed the seed combination
    SeedConfirmed,

    // Dialing events
    /// All three moves and their settle delays are done
    DialComplete,

    // Probe events
    /// Shackle gave way
    ProbeOpen,
    /// Shackle held and another combination is available
    ProbeClosed,
    /// Innermost digit wrapped; the slip check is due
    CheckpointReached,
    /// Shackle held and the enumeration is finished
    EnumerationExhausted,

    // Slip check events
    /// Slip check passed
    NoAnomaly,
    /// Slip check suspects the dial slipped
    AnomalyDetected,

    // Stop events
    /// Operator interrupt observed between attempts
    Interrupted,
    /// Hardware or log fault
    Fault(HaltReason),
}
