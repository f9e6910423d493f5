#![no_std]
// associated re-typing not supported in rust yet
#![allow(clippy::type_complexity)]

//! Blocking driver for ST7789 LCD controllers on an SPI bus.
//!
//! The driver frames commands with 8-bit SPI words and streams pixels as
//! 16-bit words. Consecutive [`Display::write`] calls share one memory write
//! session, so a frame can be flushed in chunks without re-sending the RAMWR
//! command or reconfiguring the bus. Any command, including
//! [`Display::set_window`], ends the session.
//!
//! ```
//! use lcd_st7789::{interface::SpiInterface, options::Rotation, Builder};
//! # use lcd_st7789::_mock::{MockBus, MockDelay, MockOutputPin};
//! # let (spi, dc, cs, rst, bl) = (MockBus, MockOutputPin, MockOutputPin, MockOutputPin, MockOutputPin);
//! # let mut delay = MockDelay;
//!
//! let di = SpiInterface::with_chip_select(spi, dc, cs, MockDelay);
//! let mut display = Builder::new(di)
//!     .reset_pin(rst)
//!     .backlight_pin(bl)
//!     .display_size(240, 320)
//!     .rotation(Rotation::Deg0)
//!     .init(&mut delay)
//!     .unwrap();
//!
//! // Top left 2x2 pixels, red
//! display.set_window(0, 1, 0, 1).unwrap();
//! display.write(&[0xf8, 0x00, 0xf8, 0x00]).unwrap();
//! display.write(&[0xf8, 0x00, 0xf8, 0x00]).unwrap();
//! ```

use embedded_graphics_core::pixelcolor::{IntoStorage, Rgb565};
use embedded_hal::digital::{Error as _, ErrorKind, OutputPin};

pub mod interface;
use interface::{BusMode, Interface, Line};

pub mod options;
use options::{ModelOptions, Rotation, RAM_ROWS};

mod builder;
pub use builder::*;

pub mod dcs;
use dcs::InterfaceExt;

mod st7789;

pub mod raw_framebuf;

pub mod _troubleshooting;

#[doc(hidden)]
pub mod _mock;

#[cfg(test)]
mod test_support;

/// Pixels converted or repeated per bus transfer.
const PIXEL_CHUNK: usize = 32;

///
/// Display driver to connect to ST7789 TFT displays.
///
pub struct Display<DI, RST, BL>
where
    DI: Interface,
    RST: OutputPin,
    BL: OutputPin,
{
    // Command and pixel interface
    di: DI,
    // Reset pin
    rst: RST,
    // Backlight pin
    bl: BL,
    // Options fixed at init
    options: ModelOptions,
}

impl<DI, RST, BL> Display<DI, RST, BL>
where
    DI: Interface,
    RST: OutputPin,
    BL: OutputPin,
{
    /// Width and height in pixels.
    pub fn size(&self) -> (u16, u16) {
        self.options.display_size
    }

    /// Rotation applied at init.
    pub fn rotation(&self) -> Rotation {
        self.options.rotation
    }

    /// Options the display was initialized with.
    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Whether a pixel stream is open.
    pub fn bus_mode(&self) -> BusMode {
        self.di.bus_mode()
    }

    /// Sets the address window for subsequent writes, both ends inclusive.
    ///
    /// Both ranges are sent on every call. Ends any open pixel stream.
    pub fn set_window(
        &mut self,
        col_start: u16,
        col_end: u16,
        row_start: u16,
        row_end: u16,
    ) -> Result<(), DisplayError<DI::Error>> {
        log::trace!(
            "window: cols {}..={}, rows {}..={}",
            col_start,
            col_end,
            row_start,
            row_end
        );
        self.di
            .write_command(dcs::SetColumnAddress::new(col_start, col_end))?;
        self.di
            .write_command(dcs::SetPageAddress::new(row_start, row_end))?;
        Ok(())
    }

    /// Streams RGB565 pixels into the current window.
    ///
    /// `pixels` holds one big-endian 16-bit word per pixel, the order used on
    /// the wire and produced by [`raw_framebuf::RawFrameBuf`]. An odd length is
    /// rejected before anything is sent.
    pub fn write(&mut self, pixels: &[u8]) -> Result<(), DisplayError<DI::Error>> {
        if pixels.len() % 2 != 0 {
            return Err(DisplayError::OddLength(pixels.len()));
        }

        let mut words = [0u16; PIXEL_CHUNK];
        for chunk in pixels.chunks(PIXEL_CHUNK * 2) {
            let n = chunk.len() / 2;
            for (word, pair) in words.iter_mut().zip(chunk.chunks_exact(2)) {
                *word = u16::from_be_bytes([pair[0], pair[1]]);
            }
            self.di.send_pixels(&words[..n])?;
        }
        Ok(())
    }

    /// Streams native RGB565 words into the current window.
    pub fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), DisplayError<DI::Error>> {
        self.di.send_pixels(pixels)?;
        Ok(())
    }

    /// Streams a single pixel at the current write position.
    pub fn put(&mut self, pixel: u16) -> Result<(), DisplayError<DI::Error>> {
        self.write_pixels(&[pixel])
    }

    /// Sets a window from `(x, y)` to the bottom right corner, so following
    /// writes continue from that position.
    pub fn set_cursor(&mut self, x: u16, y: u16) -> Result<(), DisplayError<DI::Error>> {
        let (width, height) = self.options.display_size;
        self.set_window(x, width - 1, y, height - 1)
    }

    /// Fills the whole display with one RGB565 word.
    pub fn fill(&mut self, color: u16) -> Result<(), DisplayError<DI::Error>> {
        let (width, height) = self.options.display_size;
        self.set_window(0, width - 1, 0, height - 1)?;

        let words = [color; PIXEL_CHUNK];
        let mut remaining = usize::from(width) * usize::from(height);
        while remaining > 0 {
            let n = remaining.min(PIXEL_CHUNK);
            self.di.send_pixels(&words[..n])?;
            remaining -= n;
        }
        Ok(())
    }

    /// Fills the whole display with `color`.
    pub fn clear(&mut self, color: Rgb565) -> Result<(), DisplayError<DI::Error>> {
        self.fill(color.into_storage())
    }

    /// Sends a raw pixel data slice to the specified rectangular region of the display.
    ///
    /// `pixel_data` must hold exactly `width * height` big-endian RGB565 words.
    pub fn show_raw_data(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixel_data: &[u8],
    ) -> Result<(), DisplayError<DI::Error>> {
        let expected = usize::from(width) * usize::from(height) * 2;
        if pixel_data.len() != expected {
            return Err(DisplayError::BufferSize {
                expected,
                actual: pixel_data.len(),
            });
        }
        if expected == 0 {
            return Ok(());
        }

        let ex = x.saturating_add(width - 1);
        let ey = y.saturating_add(height - 1);

        self.set_window(x, ex, y, ey)?;
        self.write(pixel_data)
    }

    /// Sets which row of the frame memory is shown on the top line of the
    /// panel.
    ///
    /// Use [`set_vertical_scroll_region`](Self::set_vertical_scroll_region) to
    /// limit scrolling to a part of the screen.
    pub fn set_vertical_scroll_origin(&mut self, row: u16) -> Result<(), DisplayError<DI::Error>> {
        self.di.write_command(dcs::SetScrollStart::new(row))?;
        Ok(())
    }

    /// Sets the vertical scroll region.
    ///
    /// The `top_fixed_area` and `bottom_fixed_area` arguments can be used to
    /// define an area on the top and/or bottom of the display which won't be
    /// affected by scrolling.
    ///
    /// Note that this method is not affected by the current display rotation
    /// and will always scroll along the 320 rows of the frame memory.
    ///
    /// If the combined height of the fixed areas is larger than the frame
    /// memory, the whole memory scrolls.
    pub fn set_vertical_scroll_region(
        &mut self,
        top_fixed_area: u16,
        bottom_fixed_area: u16,
    ) -> Result<(), DisplayError<DI::Error>> {
        let rows = RAM_ROWS;
        let vsa_cmd = match top_fixed_area.checked_add(bottom_fixed_area) {
            Some(fixed) if fixed <= rows => {
                dcs::SetScrollArea::new(top_fixed_area, rows - fixed, bottom_fixed_area)
            }
            _ => dcs::SetScrollArea::new(0, rows, 0),
        };
        self.di.write_command(vsa_cmd)?;
        Ok(())
    }

    /// Ends an open pixel stream and releases chip select.
    ///
    /// Only needed when another device on the bus is about to be used; the
    /// next command ends the stream anyway.
    pub fn end_write(&mut self) -> Result<(), DisplayError<DI::Error>> {
        self.di.end_pixels()?;
        Ok(())
    }

    /// Switches the backlight on or off.
    pub fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError<DI::Error>> {
        log::debug!("backlight {}", if on { "on" } else { "off" });
        let res = if on {
            self.bl.set_high()
        } else {
            self.bl.set_low()
        };
        res.map_err(|e| DisplayError::Pin(Line::Backlight, e.kind()))
    }

    ///
    /// Release resources allocated to this driver back.
    /// This returns the display interface, reset pin and backlight pin, deconstructing the driver.
    ///
    pub fn release(self) -> (DI, RST, BL) {
        (self.di, self.rst, self.bl)
    }

    /// Returns the interface for sending raw commands.
    ///
    /// # Safety
    ///
    /// Sending raw commands to the controller can lead to undefined behaviour,
    /// because the rest of the code isn't aware of any state changes that were caused by sending raw commands.
    /// The user must ensure that the state of the controller isn't altered in a way that interferes with the normal
    /// operation of this crate.
    pub unsafe fn dcs(&mut self) -> &mut DI {
        &mut self.di
    }
}

/// Error returned by [`Display`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<DiError> {
    /// Error caused by the display interface.
    Interface(DiError),
    /// Error driving the backlight line.
    Pin(Line, ErrorKind),
    /// Pixel buffer with an odd number of bytes.
    OddLength(usize),
    /// Pixel buffer that doesn't match the target rectangle.
    BufferSize {
        /// Bytes needed for the rectangle
        expected: usize,
        /// Bytes given
        actual: usize,
    },
}

impl<DiError> From<DiError> for DisplayError<DiError> {
    fn from(value: DiError) -> Self {
        Self::Interface(value)
    }
}
