//! HD44780 16x2 character LCD behind a PCF8574 I2C backpack
//!
//! The backpack maps the expander's port to the LCD bus as
//! P0=RS, P1=RW, P2=EN, P3=backlight, P4-P7=D4-D7, so the controller is
//! always driven in 4-bit mode: every byte goes out as two nibbles, each
//! latched by pulsing EN.

use embedded_hal::delay::DelayNs;
use lockbreaker_core::traits::{DisplayError, StatusDisplay, DISPLAY_COLUMNS, DISPLAY_ROWS};
use lockbreaker_hal::i2c::I2cBus;

/// Default backpack address
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Expander bit assignments
mod pin {
    pub const RS: u8 = 0x01;
    pub const EN: u8 = 0x04;
    pub const BACKLIGHT: u8 = 0x08;
}

/// HD44780 commands
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const ENTRY_MODE_INCREMENT: u8 = 0x06;
    pub const DISPLAY_ON: u8 = 0x0C;
    pub const FUNCTION_4BIT_2LINE: u8 = 0x28;
    pub const SET_DDRAM: u8 = 0x80;
}

/// DDRAM address of the start of each row
const ROW_OFFSETS: [u8; DISPLAY_ROWS as usize] = [0x00, 0x40];

/// Character LCD driver
pub struct Lcd1602<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D> Lcd1602<I2C, D>
where
    I2C: I2cBus,
    D: DelayNs,
{
    /// Create a driver; call [`Lcd1602::init`] before use
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Run the 4-bit initialisation sequence and clear the screen
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50);

        // Force 8-bit mode three times, whatever state the controller is in
        self.write_nibble(0x30, false)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x30, false)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x30, false)?;
        self.delay.delay_us(150);

        // Switch to 4-bit
        self.write_nibble(0x20, false)?;

        self.command(cmd::FUNCTION_4BIT_2LINE)?;
        self.command(cmd::DISPLAY_ON)?;
        self.clear()?;
        self.command(cmd::ENTRY_MODE_INCREMENT)?;
        tracing::debug!(address = self.address, "lcd initialised");
        Ok(())
    }

    fn command(&mut self, value: u8) -> Result<(), DisplayError> {
        self.send(value, false)
    }

    fn send(&mut self, value: u8, rs: bool) -> Result<(), DisplayError> {
        self.write_nibble(value & 0xF0, rs)?;
        self.write_nibble((value << 4) & 0xF0, rs)
    }

    fn write_nibble(&mut self, nibble: u8, rs: bool) -> Result<(), DisplayError> {
        let data = nibble | if rs { pin::RS } else { 0 };
        self.expander_write(data | pin::EN)?;
        self.delay.delay_us(1);
        self.expander_write(data)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn expander_write(&mut self, data: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[data | pin::BACKLIGHT])
            .map_err(|_| DisplayError::Bus)
    }
}

impl<I2C, D> StatusDisplay for Lcd1602<I2C, D>
where
    I2C: I2cBus,
    D: DelayNs,
{
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    fn write_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        let offset = *ROW_OFFSETS
            .get(row as usize)
            .ok_or(DisplayError::InvalidRow)?;
        self.command(cmd::SET_DDRAM | offset)?;

        let mut chars = text.chars();
        for _ in 0..DISPLAY_COLUMNS {
            let byte = match chars.next() {
                Some(c) if c.is_ascii() => c as u8,
                Some(_) => b'?',
                None => b' ',
            };
            self.send(byte, true)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct MockI2c {
        writes: Vec<(u8, u8)>,
        fail: bool,
    }

    impl I2cBus for MockI2c {
        type Error = ();

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            for byte in data {
                self.writes.push((address, *byte));
            }
            Ok(())
        }

        fn read(&mut self, _address: u8, _buf: &mut [u8]) -> Result<(), ()> {
            Ok(())
        }

        fn write_read(&mut self, _address: u8, _w: &[u8], _r: &mut [u8]) -> Result<(), ()> {
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn lcd() -> Lcd1602<MockI2c, NoDelay> {
        Lcd1602::new(MockI2c::default(), NoDelay, DEFAULT_ADDRESS)
    }

    /// Reassemble (rs, byte) pairs from the latched nibbles
    fn latched_bytes(writes: &[(u8, u8)]) -> Vec<(bool, u8)> {
        let nibbles: Vec<u8> = writes
            .iter()
            .filter(|(_, b)| b & pin::EN != 0)
            .map(|(_, b)| *b)
            .collect();
        nibbles
            .chunks(2)
            .map(|pair| (pair[0] & pin::RS != 0, (pair[0] & 0xF0) | (pair[1] >> 4)))
            .collect()
    }

    #[test]
    fn test_init_sequence() {
        let mut lcd = lcd();
        lcd.init().unwrap();
        let writes = &lcd.i2c.writes;

        assert!(writes.iter().all(|(addr, _)| *addr == 0x27));
        // First latch: 0x3 nibble, EN and backlight set
        assert_eq!(writes[0].1, 0x30 | pin::EN | pin::BACKLIGHT);
        assert_eq!(writes[1].1, 0x30 | pin::BACKLIGHT);

        // Three 8-bit resets plus the 4-bit switch are single nibbles
        let commands = latched_bytes(&writes[8..]);
        assert_eq!(
            commands,
            vec![
                (false, cmd::FUNCTION_4BIT_2LINE),
                (false, cmd::DISPLAY_ON),
                (false, cmd::CLEAR),
                (false, cmd::ENTRY_MODE_INCREMENT),
            ]
        );
    }

    #[test]
    fn test_write_line_pads_to_width() {
        let mut lcd = lcd();
        lcd.write_line(1, "Lock OPEN!").unwrap();
        let bytes = latched_bytes(&lcd.i2c.writes);

        assert_eq!(bytes[0], (false, 0x80 | 0x40));
        assert!(bytes[1..].iter().all(|(rs, _)| *rs));
        let text: Vec<u8> = bytes[1..].iter().map(|(_, b)| *b).collect();
        assert_eq!(text, b"Lock OPEN!      ".to_vec());
    }

    #[test]
    fn test_write_line_truncates_and_replaces() {
        let mut lcd = lcd();
        lcd.write_line(0, "172.5° is far too long").unwrap();
        let bytes = latched_bytes(&lcd.i2c.writes);
        let text: Vec<u8> = bytes[1..].iter().map(|(_, b)| *b).collect();
        assert_eq!(text, b"172.5? is far to".to_vec());
    }

    #[test]
    fn test_invalid_row() {
        let mut lcd = lcd();
        assert_eq!(lcd.write_line(2, "x"), Err(DisplayError::InvalidRow));
        assert!(lcd.i2c.writes.is_empty());
    }

    #[test]
    fn test_bus_error() {
        let mut lcd = lcd();
        lcd.i2c.fail = true;
        assert_eq!(lcd.clear(), Err(DisplayError::Bus));
    }

    #[test]
    fn test_show_writes_both_rows() {
        let mut lcd = lcd();
        lcd.show("All Combos", "FAILED!").unwrap();
        let bytes = latched_bytes(&lcd.i2c.writes);
        // Address + 16 characters per row
        assert_eq!(bytes.len(), 34);
        assert_eq!(bytes[17], (false, 0xC0));
    }
}
