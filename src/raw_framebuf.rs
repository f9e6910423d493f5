//! A framebuffer that stores RGB565 pixels as raw bytes, ready for the display.
//!
//! [`RawFrameBuf`] is an `embedded-graphics` [`DrawTarget`] that renders into an
//! in-memory byte buffer in the exact order the ST7789 expects on the wire: one
//! big-endian 16-bit word per pixel, rows top to bottom. A frame is drawn off
//! screen and then handed to [`Display::show_raw_data`](crate::Display::show_raw_data)
//! or [`Display::write`](crate::Display::write) in one go.
//!
//! # Example
//!
//! ```
//! use embedded_graphics::pixelcolor::Rgb565;
//! use embedded_graphics::prelude::*;
//! use embedded_graphics::primitives::{Circle, PrimitiveStyle};
//! use lcd_st7789::raw_framebuf::RawFrameBuf;
//!
//! const WIDTH: usize = 64;
//! const HEIGHT: usize = 64;
//! const FRAME_SIZE: usize = WIDTH * HEIGHT * 2;
//!
//! let mut frame_buffer = [0u8; FRAME_SIZE];
//! let mut fbuf = RawFrameBuf::new(&mut frame_buffer[..], WIDTH, HEIGHT);
//!
//! fbuf.clear(Rgb565::BLACK).unwrap();
//! Circle::new(Point::new(16, 16), 32)
//!     .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
//!     .draw(&mut fbuf)
//!     .unwrap();
//!
//! # let mut display = lcd_st7789::_mock::new_mock_display();
//! display
//!     .show_raw_data(0, 0, WIDTH as u16, HEIGHT as u16, fbuf.as_bytes())
//!     .unwrap();
//! ```

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions},
    pixelcolor::{IntoStorage, Rgb565},
    prelude::*,
    primitives::Rectangle,
    Pixel,
};

/// Bytes per RGB565 pixel.
pub const BYTES_PER_PIXEL: usize = 2;

/// A trait for abstracting over a mutable byte buffer.
///
/// This allows [`RawFrameBuf`] to be agnostic to the underlying buffer's storage,
/// accepting anything that can provide a mutable byte slice, such as a `&mut [u8]`
/// or a custom memory-mapped region.
pub trait RawBufferBackendMut {
    /// Returns a mutable slice to the entire buffer.
    fn as_mut_u8_slice(&mut self) -> &mut [u8];

    /// Returns an immutable slice to the entire buffer.
    fn as_u8_slice(&self) -> &[u8];

    /// Returns the total length of the buffer in bytes.
    fn u8_len(&self) -> usize;
}

impl RawBufferBackendMut for &mut [u8] {
    fn as_mut_u8_slice(&mut self) -> &mut [u8] {
        self
    }

    fn as_u8_slice(&self) -> &[u8] {
        self
    }

    fn u8_len(&self) -> usize {
        self.len()
    }
}

/// An RGB565 framebuffer that writes wire-order bytes into a raw buffer.
pub struct RawFrameBuf<BUF>
where
    BUF: RawBufferBackendMut,
{
    buffer: BUF,
    width: usize,
    height: usize,
}

impl<BUF> RawFrameBuf<BUF>
where
    BUF: RawBufferBackendMut,
{
    /// Creates a new raw framebuffer.
    ///
    /// # Panics
    ///
    /// Panics if the provided `buffer` is smaller than `width * height * 2`.
    pub fn new(buffer: BUF, width: usize, height: usize) -> Self {
        let expected_len = width * height * BYTES_PER_PIXEL;
        assert!(
            buffer.u8_len() >= expected_len,
            "RawFrameBuf underlying buffer is too small. Expected at least {}, got {}.",
            expected_len,
            buffer.u8_len()
        );
        Self {
            buffer,
            width,
            height,
        }
    }

    /// Returns the width of the framebuffer in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height of the framebuffer in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    fn active_len(&self) -> usize {
        self.width * self.height * BYTES_PER_PIXEL
    }

    /// Returns the frame as bytes, exactly `width * height * 2` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_u8_slice()[..self.active_len()]
    }

    /// Returns the frame as mutable bytes.
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        let len = self.active_len();
        &mut self.buffer.as_mut_u8_slice()[..len]
    }

    fn put_pixel(&mut self, point: Point, bytes: [u8; BYTES_PER_PIXEL]) {
        let index = (point.y as usize * self.width + point.x as usize) * BYTES_PER_PIXEL;
        self.as_mut_bytes()[index..index + BYTES_PER_PIXEL].copy_from_slice(&bytes);
    }
}

impl<BUF> OriginDimensions for RawFrameBuf<BUF>
where
    BUF: RawBufferBackendMut,
{
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

fn wire_bytes(color: Rgb565) -> [u8; BYTES_PER_PIXEL] {
    color.into_storage().to_be_bytes()
}

impl<BUF> DrawTarget for RawFrameBuf<BUF>
where
    BUF: RawBufferBackendMut,
{
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounding_box = self.bounding_box();
        for Pixel(coord, color) in pixels {
            if bounding_box.contains(coord) {
                self.put_pixel(coord, wire_bytes(color));
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let bytes = wire_bytes(color);
        if bytes[0] == bytes[1] {
            self.as_mut_bytes().fill(bytes[0]);
        } else {
            for chunk in self.as_mut_bytes().chunks_exact_mut(BYTES_PER_PIXEL) {
                chunk.copy_from_slice(&bytes);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let drawable_area = area.intersection(&self.bounding_box());
        if drawable_area.is_zero_sized() {
            return Ok(());
        }

        let bytes = wire_bytes(color);
        for p in drawable_area.points() {
            self.put_pixel(p, bytes);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::Rgb565;

    use super::*;

    #[test]
    fn pixels_land_in_wire_order() {
        let mut buf = [0u8; 4 * 3 * 2];
        let mut fb = RawFrameBuf::new(&mut buf[..], 4, 3);

        fb.draw_iter([
            Pixel(Point::new(1, 2), Rgb565::RED),
            Pixel(Point::new(9, 9), Rgb565::RED),
        ])
        .unwrap();

        let index = (2 * 4 + 1) * 2;
        assert_eq!(&fb.as_bytes()[index..index + 2], &[0xf8, 0x00]);
        assert_eq!(fb.as_bytes().iter().filter(|b| **b != 0).count(), 1);
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut buf = [0u8; 8];
        let mut fb = RawFrameBuf::new(&mut buf[..], 2, 2);

        fb.clear(Rgb565::BLUE).unwrap();
        assert_eq!(fb.as_bytes(), &[0x00, 0x1f, 0x00, 0x1f, 0x00, 0x1f, 0x00, 0x1f]);

        fb.clear(Rgb565::WHITE).unwrap();
        assert!(fb.as_bytes().iter().all(|b| *b == 0xff));
    }

    #[test]
    fn fill_solid_is_clipped() {
        let mut buf = [0u8; 3 * 3 * 2];
        let mut fb = RawFrameBuf::new(&mut buf[..], 3, 3);

        fb.fill_solid(
            &Rectangle::new(Point::new(2, 2), Size::new(5, 5)),
            Rgb565::GREEN,
        )
        .unwrap();

        assert_eq!(&fb.as_bytes()[16..], &[0x07, 0xe0]);
        assert!(fb.as_bytes()[..16].iter().all(|b| *b == 0));
    }

    #[test]
    fn extra_buffer_is_not_exposed() {
        let mut buf = [0u8; 32];
        let fb = RawFrameBuf::new(&mut buf[..], 2, 2);
        assert_eq!(fb.as_bytes().len(), 8);
        assert_eq!(fb.size(), Size::new(2, 2));
    }

    #[test]
    #[should_panic]
    fn small_buffer_panics() {
        let mut buf = [0u8; 7];
        let _ = RawFrameBuf::new(&mut buf[..], 2, 2);
    }
}
