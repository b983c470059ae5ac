//! I2C master

use lockbreaker_hal::i2c::I2cBus;
use rppal::i2c::I2c;

/// I2C bus; the slave address is set per transaction
pub struct RpiI2c {
    i2c: I2c,
    address: Option<u8>,
}

impl RpiI2c {
    pub(crate) fn new(i2c: I2c) -> Self {
        Self { i2c, address: None }
    }

    fn select(&mut self, address: u8) -> Result<(), rppal::i2c::Error> {
        if self.address != Some(address) {
            self.i2c.set_slave_address(address as u16)?;
            self.address = Some(address);
        }
        Ok(())
    }
}

impl I2cBus for RpiI2c {
    type Error = rppal::i2c::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.select(address)?;
        self.i2c.write(data).map(|_| ())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.select(address)?;
        self.i2c.read(buf).map(|_| ())
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.select(address)?;
        self.i2c.write_read(write_data, read_buf)
    }
}
