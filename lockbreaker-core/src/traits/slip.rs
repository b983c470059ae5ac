//! Dial slip detection

/// External check that the dial has not slipped against the stepper
///
/// Implementations compare the number they expect under the index with
/// the one actually read (optically, in practice).
pub trait SlipCheck {
    /// Run the check; `true` means a slip is suspected
    fn anomaly_detected(&mut self) -> bool;
}

impl<T: SlipCheck + ?Sized> SlipCheck for &mut T {
    fn anomaly_detected(&mut self) -> bool {
        (**self).anomaly_detected()
    }
}

/// Slip check that never reports an anomaly
///
/// Used when no optical check is fitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSlipCheck;

impl SlipCheck for NoSlipCheck {
    fn anomaly_detected(&mut self) -> bool {
        false
    }
}
