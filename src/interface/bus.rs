//! Bus abstraction with switchable word size.
//!
//! The controller takes commands as 8-bit words and pixels as 16-bit words, and
//! most microcontroller SPI blocks can switch frame size on the fly. The
//! [`Bus`] trait exposes exactly the primitives the driver needs from such a
//! peripheral. For HALs that only offer an [`embedded_hal::spi::SpiBus<u8>`],
//! [`ByteBus`] provides a fixed-width fallback.

use embedded_hal::spi::{Mode, SpiBus, MODE_0, MODE_3};

/// Size of a single transfer word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WordSize {
    /// 8 bits per word, used for commands and parameters.
    Eight,
    /// 16 bits per word, used for RGB565 pixel streams.
    Sixteen,
}

impl WordSize {
    /// Number of bits per word.
    pub const fn bits(self) -> u8 {
        match self {
            WordSize::Eight => 8,
            WordSize::Sixteen => 16,
        }
    }
}

/// Bit order on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first.
    #[default]
    MsbFirst,
    /// Least significant bit first.
    LsbFirst,
}

/// Complete frame format handed to [`Bus::set_format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    /// Bits per word
    pub word_size: WordSize,
    /// Clock polarity and phase
    pub mode: Mode,
    /// Bit order
    pub bit_order: BitOrder,
}

/// Clock convention for the way the display is wired.
///
/// Chosen once when the interface is created and never re-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusProfile {
    /// Chip select is wired and driven by the interface. SPI mode 0.
    Shared,
    /// No chip select, the display owns the bus. Modules with CS tied low only
    /// latch reliably with the clock idling high: SPI mode 3.
    Dedicated,
}

impl BusProfile {
    /// SPI mode for this wiring.
    pub const fn mode(self) -> Mode {
        match self {
            BusProfile::Shared => MODE_0,
            BusProfile::Dedicated => MODE_3,
        }
    }

    /// Frame format for the given word size.
    pub const fn format(self, word_size: WordSize) -> Format {
        Format {
            word_size,
            mode: self.mode(),
            bit_order: BitOrder::MsbFirst,
        }
    }

    /// Whether the chip select line is driven by the interface.
    pub const fn manages_chip_select(self) -> bool {
        matches!(self, BusProfile::Shared)
    }
}

/// Blocking SPI bus with reconfigurable frame format.
///
/// Every write must have left the wire when it returns, since the interface
/// toggles control lines right after.
pub trait Bus {
    /// Error type
    type Error: core::fmt::Debug;

    /// Set the bus clock. Implementations pick the closest rate they support.
    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error>;

    /// Change the frame format used by subsequent writes.
    fn set_format(&mut self, format: Format) -> Result<(), Self::Error>;

    /// Write 8-bit words.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Write 16-bit words.
    fn write_words(&mut self, words: &[u16]) -> Result<(), Self::Error>;
}

impl<T: Bus + ?Sized> Bus for &mut T {
    type Error = T::Error;

    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error> {
        T::set_frequency(self, hz)
    }

    fn set_format(&mut self, format: Format) -> Result<(), Self::Error> {
        T::set_format(self, format)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        T::write(self, bytes)
    }

    fn write_words(&mut self, words: &[u16]) -> Result<(), Self::Error> {
        T::write_words(self, words)
    }
}

/// [`Bus`] adapter for an 8-bit [`SpiBus`].
///
/// Mode and clock are whatever the HAL was configured with, so
/// [`Bus::set_format`] and [`Bus::set_frequency`] are no-ops. 16-bit words
/// go out as big-endian byte pairs, which is bit-identical to a 16-bit
/// MSB-first frame.
pub struct ByteBus<SPI> {
    spi: SPI,
}

const BYTE_CHUNK: usize = 64;

impl<SPI> ByteBus<SPI>
where
    SPI: SpiBus<u8>,
{
    /// Wrap an 8-bit SPI bus.
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Release the wrapped bus.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Bus for ByteBus<SPI>
where
    SPI: SpiBus<u8>,
{
    type Error = SPI::Error;

    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error> {
        log::trace!("byte bus: frequency {} Hz left to the HAL", hz);
        Ok(())
    }

    fn set_format(&mut self, format: Format) -> Result<(), Self::Error> {
        log::trace!("byte bus: {}-bit frames sent as bytes", format.word_size.bits());
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.spi.write(bytes)?;
        self.spi.flush()
    }

    fn write_words(&mut self, words: &[u16]) -> Result<(), Self::Error> {
        let mut buf = [0u8; BYTE_CHUNK];
        for chunk in words.chunks(BYTE_CHUNK / 2) {
            for (dst, word) in buf.chunks_exact_mut(2).zip(chunk) {
                dst.copy_from_slice(&word.to_be_bytes());
            }
            self.spi.write(&buf[..chunk.len() * 2])?;
        }
        self.spi.flush()
    }
}
