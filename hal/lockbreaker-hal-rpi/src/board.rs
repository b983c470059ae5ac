//! Board bring-up from the pin configuration

use lockbreaker_core::config::PinConfig;
use lockbreaker_hal::spi::SpiConfig;
use rppal::gpio::Gpio;
use rppal::i2c::I2c;
use rppal::spi::Spi;
use thiserror::Error;

use crate::gpio::{RpiInput, RpiOutput};
use crate::i2c::RpiI2c;
use crate::pwm::RpiPwm;
use crate::spi::{self, RpiSpi};

/// Errors bringing up the board
#[derive(Debug, Error)]
pub enum BoardError {
    /// GPIO controller could not be opened
    #[error("failed to open GPIO controller")]
    Gpio(#[source] rppal::gpio::Error),
    /// One pin could not be claimed
    #[error("failed to claim GPIO {pin}")]
    Pin {
        pin: u8,
        #[source]
        source: rppal::gpio::Error,
    },
    /// No such SPI bus or slave select
    #[error("no SPI bus {bus} with slave select {ss}")]
    SpiSelect { bus: u8, ss: u8 },
    /// SPI bus could not be opened
    #[error("failed to open SPI bus {bus}")]
    Spi {
        bus: u8,
        #[source]
        source: rppal::spi::Error,
    },
    /// I2C bus could not be opened
    #[error("failed to open I2C bus")]
    I2c(#[from] rppal::i2c::Error),
}

/// Every peripheral the rig uses
pub struct Board {
    /// Stepper step pulse
    pub step: RpiOutput,
    /// Stepper direction
    pub dir: RpiOutput,
    /// Stepper enable
    pub enable: RpiOutput,
    /// Shackle servo signal
    pub servo: RpiPwm,
    /// Encoder clock
    pub encoder_clk: RpiInput,
    /// Encoder data
    pub encoder_dt: RpiInput,
    /// Encoder push button
    pub button: RpiInput,
    /// Feedback ADC bus
    pub spi: RpiSpi,
    /// LCD backpack bus
    pub i2c: RpiI2c,
}

impl Board {
    /// Claim the pins and buses named in `pins`
    pub fn open(pins: &PinConfig, servo_hz: u16) -> Result<Self, BoardError> {
        let gpio = Gpio::new().map_err(BoardError::Gpio)?;
        let claim = |pin: u8| {
            gpio.get(pin)
                .map_err(|source| BoardError::Pin { pin, source })
        };

        let step = RpiOutput::new(claim(pins.step)?.into_output_low());
        let dir = RpiOutput::new(claim(pins.dir)?.into_output_low());
        // Active-low enable: start released
        let enable = RpiOutput::new(claim(pins.enable)?.into_output_high());
        let servo = RpiPwm::new(claim(pins.servo)?.into_output_low(), servo_hz);
        let encoder_clk = RpiInput::new(claim(pins.encoder_clk)?.into_input_pullup());
        let encoder_dt = RpiInput::new(claim(pins.encoder_dt)?.into_input_pullup());
        let button = RpiInput::new(claim(pins.button)?.into_input_pullup());

        let select = SpiConfig::default();
        let (bus, ss) = spi::bus(pins.spi_bus)
            .zip(spi::slave_select(pins.spi_ss))
            .ok_or(BoardError::SpiSelect {
                bus: pins.spi_bus,
                ss: pins.spi_ss,
            })?;
        let spi = Spi::new(bus, ss, select.frequency, spi::mode(select.mode)).map_err(|source| {
            BoardError::Spi {
                bus: pins.spi_bus,
                source,
            }
        })?;

        let i2c = I2c::new()?;

        tracing::info!(
            step = pins.step,
            dir = pins.dir,
            enable = pins.enable,
            servo = pins.servo,
            spi_bus = pins.spi_bus,
            lcd_address = pins.lcd_address,
            "board opened"
        );

        Ok(Self {
            step,
            dir,
            enable,
            servo,
            encoder_clk,
            encoder_dt,
            button,
            spi: RpiSpi::new(spi),
            i2c: RpiI2c::new(i2c),
        })
    }
}
