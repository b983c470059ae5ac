//! SPI master

use lockbreaker_hal::spi::{Mode, SpiBus};
use rppal::spi::{Bus, SlaveSelect, Spi};

/// SPI bus with a fixed slave select
pub struct RpiSpi {
    spi: Spi,
}

impl RpiSpi {
    pub(crate) fn new(spi: Spi) -> Self {
        Self { spi }
    }
}

pub(crate) fn bus(index: u8) -> Option<Bus> {
    match index {
        0 => Some(Bus::Spi0),
        1 => Some(Bus::Spi1),
        2 => Some(Bus::Spi2),
        3 => Some(Bus::Spi3),
        4 => Some(Bus::Spi4),
        5 => Some(Bus::Spi5),
        6 => Some(Bus::Spi6),
        _ => None,
    }
}

pub(crate) fn slave_select(index: u8) -> Option<SlaveSelect> {
    match index {
        0 => Some(SlaveSelect::Ss0),
        1 => Some(SlaveSelect::Ss1),
        2 => Some(SlaveSelect::Ss2),
        _ => None,
    }
}

pub(crate) fn mode(mode: Mode) -> rppal::spi::Mode {
    match mode {
        Mode::Mode0 => rppal::spi::Mode::Mode0,
        Mode::Mode1 => rppal::spi::Mode::Mode1,
        Mode::Mode2 => rppal::spi::Mode::Mode2,
        Mode::Mode3 => rppal::spi::Mode::Mode3,
    }
}

impl SpiBus for RpiSpi {
    type Error = rppal::spi::Error;

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.spi.transfer(read, write).map(|_| ())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.spi.write(data).map(|_| ())
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        let write = data.to_vec();
        self.spi.transfer(data, &write).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_lookup() {
        assert_eq!(bus(0), Some(Bus::Spi0));
        assert_eq!(bus(7), None);
        assert_eq!(slave_select(1), Some(SlaveSelect::Ss1));
        assert_eq!(slave_select(3), None);
    }
}
