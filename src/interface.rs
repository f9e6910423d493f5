//! Interface traits and implementations

mod spi;
pub use spi::*;

mod bus;
pub use bus::*;

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

/// Command and pixel interface
pub trait Interface {
    /// Error type
    type Error: core::fmt::Debug;

    /// Prepares the bus and parks the control lines in their idle state.
    ///
    /// Called once by the initialization sequence before the first command.
    fn init(&mut self, frequency_hz: u32) -> Result<(), Self::Error>;

    /// Send a command with optional parameters
    ///
    /// Any open pixel stream is closed by this call.
    fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error>;

    /// Stream 16-bit pixel words into the current address window.
    ///
    /// The first call after a command opens a memory write session, later calls
    /// append to it.
    fn send_pixels(&mut self, words: &[u16]) -> Result<(), Self::Error>;

    /// Close an open pixel stream. Does nothing in command mode.
    fn end_pixels(&mut self) -> Result<(), Self::Error>;

    /// Current bus mode.
    fn bus_mode(&self) -> BusMode;
}

impl<T: Interface + ?Sized> Interface for &mut T {
    type Error = T::Error;

    fn init(&mut self, frequency_hz: u32) -> Result<(), Self::Error> {
        T::init(self, frequency_hz)
    }

    fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error> {
        T::send_command(self, command, args)
    }

    fn send_pixels(&mut self, words: &[u16]) -> Result<(), Self::Error> {
        T::send_pixels(self, words)
    }

    fn end_pixels(&mut self) -> Result<(), Self::Error> {
        T::end_pixels(self)
    }

    fn bus_mode(&self) -> BusMode {
        T::bus_mode(self)
    }
}

/// Which kind of transfer the bus is currently set up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusMode {
    /// 8-bit words, chip released between commands.
    #[default]
    Command,
    /// 16-bit words, chip selected and data/command line in the data state,
    /// following a memory write command.
    Streaming,
}

/// Control line identifier, used to report which line failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Chip select
    ChipSelect,
    /// Data/command select
    DataCommand,
    /// Hardware reset
    Reset,
    /// Backlight enable
    Backlight,
}

/// Placeholder for an optional pin that isn't wired.
///
/// Used as the chip select type of a dedicated bus, and as the default reset
/// and backlight pin types of the [`Builder`](crate::Builder).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
