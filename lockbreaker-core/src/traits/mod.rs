//! Hardware and collaborator abstraction traits
//!
//! These traits define the interface between the dialing engine and
//! hardware-specific or process-level implementations.

pub mod attempt_log;
pub mod display;
pub mod shackle;
pub mod slip;
pub mod stepper;

pub use attempt_log::{AttemptLog, LogError};
pub use display::{DisplayError, StatusDisplay, DISPLAY_COLUMNS, DISPLAY_ROWS};
pub use shackle::{FeedbackSensor, ProbeError, ProbeReport, SensorError, ShackleProbe};
pub use slip::{NoSlipCheck, SlipCheck};
pub use stepper::{Direction, StepperDriver};
