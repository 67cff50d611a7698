//! HD44780 character LCD driver for displays wired behind a PCF8574-style
//! I2C GPIO expander.
//!
//! The expander exposes the controller's 4-bit data bus and control lines as
//! the bits of a single I2C-writable byte, so the whole protocol reduces to
//! one transport primitive: write a byte to a 7-bit device address. Provide
//! that primitive by implementing [`I2cBus`] for your platform's bus handle,
//! then drive the display through [`hd44780::Lcd`]:
//!
//! ```no_run
//! # use lcd_pcf8574::{I2cBus, LcdResult};
//! # use lcd_pcf8574::hd44780::{Config, Lcd};
//! # fn demo(bus: &mut dyn I2cBus) -> LcdResult<()> {
//! let mut lcd = Lcd::new(bus, Config::default())?;
//! lcd.set_cursor(0, 1)?;
//! lcd.print_ext("temp 21{0xDF}C")?;
//! # Ok(())
//! # }
//! ```
//!
//! The driver is fully synchronous: every operation completes its hardware
//! transaction, including the controller's mandatory latch delays, before
//! returning. It never reads back from the display and never retries a
//! failed bus write.

pub mod expander;
pub mod hd44780;

#[cfg(test)]
pub(crate) mod testutil;

use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum LcdError {
    /// Construction-time validation failed; no driver is returned.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// An operation argument was rejected before any hardware write.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The underlying bus write failed. The protocol has no acknowledgment
    /// channel, so this is fatal and never retried.
    #[error("I2C error: {0}")]
    Io(std::io::ErrorKind),
}

impl From<std::io::Error> for LcdError {
    fn from(err: std::io::Error) -> Self {
        LcdError::Io(err.kind())
    }
}

pub type LcdResult<T> = Result<T, LcdError>;

/// The transport seam between the driver and the platform.
///
/// A single operation is enough: the PCF8574 has no registers, every byte
/// written to its address appears directly on its output pins.
pub trait I2cBus: Debug {
    /// Writes one byte to the device at the given 7-bit address.
    fn write(&mut self, addr: u8, byte: u8) -> LcdResult<()>;
}
