//! # Troubleshooting guide
//!
//! This guide lists common issues that can cause a blank or corrupted display.
//!
//! ## Display stays black/blank
//!
//! ### Reset pin
//!
//! The reset pin of the ST7789 is active low, requiring it to be driven
//! **high** in order for the display to operate. Pass it to the builder via
//! the `reset_pin` method and the power-on sequence will release it. If this
//! isn't possible in the target application the user must make sure that the
//! reset pin is kept in the high state before `init` is called.
//!
//! ### Backlight pin
//!
//! The backlight is only switched on after the display-on command. Without a
//! `backlight_pin` on the builder, the backlight has to be switched on
//! manually. First thing to try is to see if setting the backlight pin to
//! high fixes the issue.
//!
//! ### Shortened delays
//!
//! The power-on sequence waits 100 ms after releasing reset, 150 ms after the
//! software reset and 50 ms after leaving sleep. A [`DelayNs`] implementation
//! that returns early (for example a timer that isn't running yet) gives a
//! controller that ignores part of its configuration.
//!
//! [`DelayNs`]: embedded_hal::delay::DelayNs
//!
//! ## Garbled image
//!
//! ### Wrong SPI mode
//!
//! Modules with a chip select pin work with SPI mode 0. Modules without one
//! (CS tied low on the board) need SPI mode 3. The interface picks the mode
//! from the constructor that was used:
//!
//! ```
//! use lcd_st7789::interface::{BusProfile, SpiInterface};
//! use embedded_hal::spi::{MODE_0, MODE_3};
//! # use lcd_st7789::_mock::{MockBus, MockDelay, MockOutputPin};
//!
//! let with_cs = SpiInterface::with_chip_select(MockBus, MockOutputPin, MockOutputPin, MockDelay);
//! assert_eq!(with_cs.profile().mode(), MODE_0);
//!
//! let without_cs = SpiInterface::new(MockBus, MockOutputPin, MockDelay);
//! assert_eq!(without_cs.profile().mode(), MODE_3);
//! ```
//!
//! A [`Bus`](crate::interface::Bus) implementation must apply the mode it is
//! given in `set_format`. With [`ByteBus`](crate::interface::ByteBus) the mode
//! comes from the HAL configuration instead, so it has to be set there.
//!
//! ### Byte-swapped colors
//!
//! [`Display::write`](crate::Display::write) expects big-endian pixel words.
//! Buffers filled with `u16` values on a little-endian MCU and reinterpreted
//! as bytes show swapped color channels; pass them to
//! [`Display::write_pixels`](crate::Display::write_pixels) instead.
//!
//! ### Bus shared with other devices
//!
//! Consecutive writes keep the display selected. Call
//! [`Display::end_write`](crate::Display::end_write) before talking to another
//! device on the same bus.
//!
//! ## Incorrect colors
//!
//! Most ST7789 modules use IPS panels that need color inversion, which is the
//! default. If black shows as white, turn inversion off:
//!
//! ```
//! use lcd_st7789::{Builder, options::ColorInversion};
//! # use lcd_st7789::interface::SpiInterface;
//! # use lcd_st7789::_mock::{MockBus, MockDelay, MockOutputPin};
//! # let di = SpiInterface::new(MockBus, MockOutputPin, MockDelay);
//! # let mut delay = MockDelay;
//!
//! let display = Builder::new(di)
//!     .invert_colors(ColorInversion::Normal)
//!     .init(&mut delay)
//!     .unwrap();
//! ```
//!
//! ## Picture offset or cut off
//!
//! Panels smaller than the 240x320 frame memory (for example 240x240) show a
//! part of it. After a 90° or 180° rotation the visible part may start at an
//! offset which has to be added to the window coordinates.
