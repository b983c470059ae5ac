//! MCP3008 8-channel 10-bit ADC
//!
//! Single-ended conversions over SPI. One conversion is one 3-byte
//! full-duplex transfer: start bit, then single-ended flag and channel in
//! the high nibble of the second byte. The result is the low 2 bits of the
//! second reply byte followed by the whole third byte.

use lockbreaker_core::traits::{FeedbackSensor, SensorError};
use lockbreaker_hal::spi::SpiBus;

/// Number of input channels
pub const CHANNELS: u8 = 8;

/// Full-scale conversion result
pub const ADC_MAX: u16 = 1023;

/// Errors from the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcError {
    /// SPI transfer failed
    Bus,
    /// Channel above 7
    InvalidChannel(u8),
}

impl From<AdcError> for SensorError {
    fn from(e: AdcError) -> Self {
        match e {
            AdcError::Bus => SensorError::Bus,
            AdcError::InvalidChannel(_) => SensorError::InvalidChannel,
        }
    }
}

/// MCP3008 on an SPI bus
pub struct Mcp3008<SPI> {
    spi: SPI,
}

impl<SPI: SpiBus> Mcp3008<SPI> {
    /// Wrap an SPI bus (mode 0, at most 1.35 MHz at 3.3 V)
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Command frame for a single-ended conversion on `channel`
    pub const fn frame(channel: u8) -> [u8; 3] {
        [0x01, (0x08 | channel) << 4, 0x00]
    }

    /// Extract the 10-bit result from a reply frame
    pub const fn decode(reply: &[u8; 3]) -> u16 {
        (((reply[1] & 0x03) as u16) << 8) | reply[2] as u16
    }

    /// Run one conversion
    pub fn read(&mut self, channel: u8) -> Result<u16, AdcError> {
        if channel >= CHANNELS {
            return Err(AdcError::InvalidChannel(channel));
        }
        let frame = Self::frame(channel);
        let mut reply = [0u8; 3];
        self.spi
            .transfer(&mut reply, &frame)
            .map_err(|_| AdcError::Bus)?;
        Ok(Self::decode(&reply))
    }

    /// Bind the converter to one channel
    pub fn into_channel(self, channel: u8) -> Result<Mcp3008Channel<SPI>, AdcError> {
        if channel >= CHANNELS {
            return Err(AdcError::InvalidChannel(channel));
        }
        Ok(Mcp3008Channel { adc: self, channel })
    }

    /// Release the bus
    pub fn release(self) -> SPI {
        self.spi
    }
}

/// One MCP3008 input used as a feedback sensor
pub struct Mcp3008Channel<SPI> {
    adc: Mcp3008<SPI>,
    channel: u8,
}

impl<SPI: SpiBus> Mcp3008Channel<SPI> {
    /// Channel number
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Release the converter
    pub fn release(self) -> Mcp3008<SPI> {
        self.adc
    }
}

impl<SPI: SpiBus> FeedbackSensor for Mcp3008Channel<SPI> {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        Ok(self.adc.read(self.channel)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    /// Bus that records frames and replies with a fixed frame
    struct MockSpi {
        reply: [u8; 3],
        sent: Vec<[u8; 3]>,
        fail: bool,
    }

    impl MockSpi {
        fn replying(reply: [u8; 3]) -> Self {
            Self {
                reply,
                sent: Vec::new(),
                fail: false,
            }
        }
    }

    impl SpiBus for MockSpi {
        type Error = ();

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            let mut frame = [0u8; 3];
            frame.copy_from_slice(write);
            self.sent.push(frame);
            read.copy_from_slice(&self.reply);
            Ok(())
        }

        fn write(&mut self, _data: &[u8]) -> Result<(), ()> {
            Ok(())
        }

        fn transfer_in_place(&mut self, _data: &mut [u8]) -> Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn test_frame_layout() {
        assert_eq!(Mcp3008::<MockSpi>::frame(0), [0x01, 0x80, 0x00]);
        assert_eq!(Mcp3008::<MockSpi>::frame(7), [0x01, 0xF0, 0x00]);
    }

    #[test]
    fn test_decode_masks_high_bits() {
        // Junk in the upper bits of byte 1 must be ignored
        assert_eq!(Mcp3008::<MockSpi>::decode(&[0xFF, 0xFE, 0x34]), 0x234);
        assert_eq!(Mcp3008::<MockSpi>::decode(&[0x00, 0x03, 0xFF]), ADC_MAX);
    }

    #[test]
    fn test_read_sends_frame() {
        let mut adc = Mcp3008::new(MockSpi::replying([0x00, 0x01, 0x00]));
        assert_eq!(adc.read(3), Ok(256));
        assert_eq!(adc.release().sent, vec![[0x01, 0xB0, 0x00]]);
    }

    #[test]
    fn test_invalid_channel() {
        let mut adc = Mcp3008::new(MockSpi::replying([0; 3]));
        assert_eq!(adc.read(8), Err(AdcError::InvalidChannel(8)));
        assert!(adc.into_channel(9).is_err());
    }

    #[test]
    fn test_channel_maps_bus_error() {
        let mut spi = MockSpi::replying([0; 3]);
        spi.fail = true;
        let mut channel = Mcp3008::new(spi).into_channel(0).unwrap();
        assert_eq!(channel.read_raw(), Err(SensorError::Bus));
    }
}
