//! Status display trait for the two-line character LCD

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Bus transaction with the display failed
    Bus,
    /// Row does not exist on this display
    InvalidRow,
}

/// Columns on the character display
pub const DISPLAY_COLUMNS: usize = 16;

/// Rows on the character display
pub const DISPLAY_ROWS: u8 = 2;

/// Trait for the front panel display
///
/// Text is ASCII; lines longer than the display are truncated and shorter
/// ones are padded with spaces so stale characters never linger.
pub trait StatusDisplay {
    /// Clear the entire screen
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Replace the contents of one row
    fn write_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError>;

    /// Replace both rows
    fn show(&mut self, top: &str, bottom: &str) -> Result<(), DisplayError> {
        self.write_line(0, top)?;
        self.write_line(1, bottom)
    }
}

impl<T: StatusDisplay + ?Sized> StatusDisplay for &mut T {
    fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear()
    }

    fn write_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        (**self).write_line(row, text)
    }
}
