//!
//! Blocking SPI interface for the ST7789.
//!
//! [`SpiInterface`] owns the bus, the data/command line, the optional chip
//! select line and a delay used for the short settle pauses the controller
//! needs around every line transition. It also tracks whether the bus is in
//! command mode (8-bit frames) or in an open pixel stream (16-bit frames) so
//! that consecutive pixel writes share one memory write session.
//!
//! # Example
//!
//! ```
//! use lcd_st7789::interface::{BusProfile, SpiInterface};
//! # use lcd_st7789::_mock::{MockBus, MockDelay, MockOutputPin};
//! # let (bus, dc, cs) = (MockBus, MockOutputPin, MockOutputPin);
//!
//! let shared = SpiInterface::with_chip_select(bus, dc, cs, MockDelay);
//! assert_eq!(shared.profile(), BusProfile::Shared);
//!
//! # let (bus, dc) = (MockBus, MockOutputPin);
//! let dedicated = SpiInterface::new(bus, dc, MockDelay);
//! assert_eq!(dedicated.profile(), BusProfile::Dedicated);
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, ErrorKind, OutputPin};

use super::{Bus, BusMode, BusProfile, Interface, Line, NoPin, WordSize};
use crate::dcs::{self, DcsCommand};

/// Pause around control line transitions, in microseconds.
pub const SETTLE_US: u32 = 1;

/// Error type for the SPI interface.
///
/// Wraps errors from the bus or one of the control lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError<BUS> {
    /// SPI bus error
    Bus(BUS),
    /// Control line error
    Pin(Line, ErrorKind),
}

/// SPI interface for the ST7789.
///
/// Use [`SpiInterface::with_chip_select`] when the display shares the bus and
/// [`SpiInterface::new`] when its chip select is tied low. The choice fixes the
/// [`BusProfile`] for the lifetime of the interface.
pub struct SpiInterface<BUS, DC, CS, D> {
    bus: BUS,
    dc: DC,
    cs: Option<CS>,
    delay: D,
    profile: BusProfile,
    mode: BusMode,
}

impl<BUS, DC, D> SpiInterface<BUS, DC, NoPin, D>
where
    BUS: Bus,
    DC: OutputPin,
    D: DelayNs,
{
    /// Create an interface for a display that owns the bus (no chip select).
    pub fn new(bus: BUS, dc: DC, delay: D) -> Self {
        Self {
            bus,
            dc,
            cs: None,
            delay,
            profile: BusProfile::Dedicated,
            mode: BusMode::Command,
        }
    }
}

impl<BUS, DC, CS, D> SpiInterface<BUS, DC, CS, D>
where
    BUS: Bus,
    DC: OutputPin,
    CS: OutputPin,
    D: DelayNs,
{
    /// Create an interface that drives a chip select line.
    pub fn with_chip_select(bus: BUS, dc: DC, cs: CS, delay: D) -> Self {
        Self {
            bus,
            dc,
            cs: Some(cs),
            delay,
            profile: BusProfile::Shared,
            mode: BusMode::Command,
        }
    }

    /// Clock convention in use.
    pub fn profile(&self) -> BusProfile {
        self.profile
    }

    /// Release the bus, pins and delay back, deconstructing the interface.
    ///
    /// An open pixel stream is left as is; call [`Interface::end_pixels`] first
    /// if the chip select line must be released.
    pub fn release(self) -> (BUS, DC, Option<CS>, D) {
        (self.bus, self.dc, self.cs, self.delay)
    }

    fn settle(&mut self) {
        self.delay.delay_us(SETTLE_US);
    }

    fn set_dc(&mut self, high: bool) -> Result<(), SpiError<BUS::Error>> {
        drive(&mut self.dc, Line::DataCommand, high)
    }

    fn set_cs(&mut self, high: bool) -> Result<(), SpiError<BUS::Error>> {
        match self.cs.as_mut() {
            Some(cs) => drive(cs, Line::ChipSelect, high),
            None => Ok(()),
        }
    }

    fn set_word_size(&mut self, word_size: WordSize) -> Result<(), SpiError<BUS::Error>> {
        self.bus
            .set_format(self.profile.format(word_size))
            .map_err(SpiError::Bus)
    }

    /// Issue RAMWR and switch the bus to 16-bit frames, keeping the chip selected.
    fn begin_stream(&mut self) -> Result<(), SpiError<BUS::Error>> {
        let mut frame = Frame::open(self)?;
        frame.write(&[dcs::WriteMemoryStart.instruction()])?;
        frame.hand_over()?;

        if let Err(e) = self.set_word_size(WordSize::Sixteen) {
            self.abort_stream();
            return Err(e);
        }
        self.mode = BusMode::Streaming;
        log::trace!("pixel stream opened");
        Ok(())
    }

    /// Best-effort return to command mode after a failed stream step.
    fn abort_stream(&mut self) {
        let _ = self.set_cs(true);
        let _ = self.set_dc(true);
        let _ = self.set_word_size(WordSize::Eight);
        self.mode = BusMode::Command;
        log::trace!("pixel stream aborted");
    }

    fn close_stream(&mut self) -> Result<(), SpiError<BUS::Error>> {
        self.settle();
        self.set_cs(true)?;
        self.settle();
        self.set_word_size(WordSize::Eight)?;
        self.mode = BusMode::Command;
        Ok(())
    }
}

impl<BUS, DC, CS, D> Interface for SpiInterface<BUS, DC, CS, D>
where
    BUS: Bus,
    DC: OutputPin,
    CS: OutputPin,
    D: DelayNs,
{
    type Error = SpiError<BUS::Error>;

    fn init(&mut self, frequency_hz: u32) -> Result<(), Self::Error> {
        log::debug!(
            "spi interface: {} Hz, {:?} bus profile",
            frequency_hz,
            self.profile
        );
        self.bus.set_frequency(frequency_hz).map_err(SpiError::Bus)?;
        self.set_word_size(WordSize::Eight)?;
        self.mode = BusMode::Command;

        self.set_cs(true)?;
        self.set_dc(true)
    }

    /// Send a command and its arguments to the display controller.
    ///
    /// The DC line is low for the command byte and high for the argument
    /// bytes. Chip select is released at the end, which also ends any open
    /// pixel stream.
    fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error> {
        if let Err(e) = self.set_word_size(WordSize::Eight) {
            self.abort_stream();
            return Err(e);
        }
        self.mode = BusMode::Command;

        let mut frame = Frame::open(self)?;
        frame.write(&[command])?;
        if !args.is_empty() {
            frame.data_phase()?;
            frame.write(args)?;
        }
        frame.close()
    }

    fn send_pixels(&mut self, words: &[u16]) -> Result<(), Self::Error> {
        if words.is_empty() {
            return Ok(());
        }
        if self.mode != BusMode::Streaming {
            self.begin_stream()?;
        }

        if let Err(e) = self.bus.write_words(words) {
            self.abort_stream();
            return Err(SpiError::Bus(e));
        }
        Ok(())
    }

    fn end_pixels(&mut self) -> Result<(), Self::Error> {
        if self.mode != BusMode::Streaming {
            return Ok(());
        }

        if let Err(e) = self.close_stream() {
            self.abort_stream();
            return Err(e);
        }
        log::trace!("pixel stream closed");
        Ok(())
    }

    fn bus_mode(&self) -> BusMode {
        self.mode
    }
}

fn drive<P: OutputPin, B>(pin: &mut P, line: Line, high: bool) -> Result<(), SpiError<B>> {
    let res = if high { pin.set_high() } else { pin.set_low() };
    res.map_err(|e| SpiError::Pin(line, e.kind()))
}

/// One chip-select bracket around a command.
///
/// Opening asserts chip select and puts the DC line in command state. If the
/// frame is dropped without [`Frame::close`] or [`Frame::hand_over`], both
/// lines are released without settle delays and errors are discarded.
struct Frame<'a, BUS, DC, CS, D>
where
    BUS: Bus,
    DC: OutputPin,
    CS: OutputPin,
    D: DelayNs,
{
    iface: &'a mut SpiInterface<BUS, DC, CS, D>,
    armed: bool,
}

impl<'a, BUS, DC, CS, D> Frame<'a, BUS, DC, CS, D>
where
    BUS: Bus,
    DC: OutputPin,
    CS: OutputPin,
    D: DelayNs,
{
    fn open(iface: &'a mut SpiInterface<BUS, DC, CS, D>) -> Result<Self, SpiError<BUS::Error>> {
        iface.settle();
        let mut frame = Self { iface, armed: true };
        frame.iface.set_cs(false)?;
        frame.iface.set_dc(false)?;
        frame.iface.settle();
        Ok(frame)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SpiError<BUS::Error>> {
        self.iface.bus.write(bytes).map_err(SpiError::Bus)
    }

    /// Switch DC to data for the parameter bytes.
    fn data_phase(&mut self) -> Result<(), SpiError<BUS::Error>> {
        self.iface.settle();
        self.iface.set_dc(true)?;
        self.iface.settle();
        Ok(())
    }

    fn close(mut self) -> Result<(), SpiError<BUS::Error>> {
        self.iface.settle();
        self.iface.set_cs(true)?;
        self.iface.set_dc(true)?;
        self.iface.settle();
        self.armed = false;
        Ok(())
    }

    /// Leave the chip selected with DC in data state, for a pixel stream.
    fn hand_over(mut self) -> Result<(), SpiError<BUS::Error>> {
        self.data_phase()?;
        self.armed = false;
        Ok(())
    }
}

impl<BUS, DC, CS, D> Drop for Frame<'_, BUS, DC, CS, D>
where
    BUS: Bus,
    DC: OutputPin,
    CS: OutputPin,
    D: DelayNs,
{
    fn drop(&mut self) {
        if self.armed {
            let _ = self.iface.set_cs(true);
            let _ = self.iface.set_dc(true);
        }
    }
}
