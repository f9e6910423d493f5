//! [super::Display] builder module

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, OutputPin};

use crate::interface::{Interface, Line, NoPin};
use crate::options::{ColorInversion, ModelOptions, Rotation};
use crate::{st7789, Display};

/// Builder for [Display] instances.
///
/// Exposes all possible display options.
///
/// # Examples
/// ```
/// use lcd_st7789::{Builder, options::Rotation};
/// # use lcd_st7789::interface::SpiInterface;
/// # use lcd_st7789::_mock::{MockBus, MockDelay, MockOutputPin};
/// # let di = SpiInterface::with_chip_select(MockBus, MockOutputPin, MockOutputPin, MockDelay);
/// # let (rst, bl) = (MockOutputPin, MockOutputPin);
/// # let mut delay = MockDelay;
///
/// let mut display = Builder::new(di)
///     .reset_pin(rst)
///     .backlight_pin(bl)
///     .display_size(320, 240)
///     .rotation(Rotation::Deg90)
///     .init(&mut delay)
///     .unwrap();
///
/// assert_eq!(display.size(), (320, 240));
/// ```
pub struct Builder<DI, RST, BL>
where
    DI: Interface,
{
    di: DI,
    rst: RST,
    bl: BL,
    display_size: Option<(u16, u16)>,
    options: ModelOptions,
}

impl<DI> Builder<DI, NoPin, NoPin>
where
    DI: Interface,
{
    ///
    /// Constructs a new builder for given [Interface].
    ///
    #[must_use]
    pub fn new(di: DI) -> Self {
        Self {
            di,
            rst: NoPin,
            bl: NoPin,
            display_size: None,
            options: ModelOptions::default(),
        }
    }
}

impl<DI, RST, BL> Builder<DI, RST, BL>
where
    DI: Interface,
    RST: OutputPin,
    BL: OutputPin,
{
    ///
    /// Sets the display size in pixels, as seen after rotation.
    ///
    /// Defaults to the full frame memory for the chosen rotation.
    ///
    #[must_use]
    pub fn display_size(mut self, width: u16, height: u16) -> Self {
        self.display_size = Some((width, height));
        self
    }

    ///
    /// Sets the [Rotation] written to MADCTL during initialization.
    ///
    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.options.rotation = rotation;
        self
    }

    ///
    /// Sets the color inversion applied during initialization.
    ///
    #[must_use]
    pub fn invert_colors(mut self, color_inversion: ColorInversion) -> Self {
        self.options.invert_colors = color_inversion;
        self
    }

    ///
    /// Sets the requested bus clock in Hz.
    ///
    #[must_use]
    pub fn bus_frequency(mut self, hz: u32) -> Self {
        self.options.bus_frequency = hz;
        self
    }

    /// Sets the reset pin.
    ///
    /// The line is driven high (inactive) before the software reset.
    #[must_use]
    pub fn reset_pin<RST2: OutputPin>(self, rst: RST2) -> Builder<DI, RST2, BL> {
        Builder {
            di: self.di,
            rst,
            bl: self.bl,
            display_size: self.display_size,
            options: self.options,
        }
    }

    /// Sets the backlight pin, switched on once the display is on.
    #[must_use]
    pub fn backlight_pin<BL2: OutputPin>(self, bl: BL2) -> Builder<DI, RST, BL2> {
        Builder {
            di: self.di,
            rst: self.rst,
            bl,
            display_size: self.display_size,
            options: self.options,
        }
    }

    ///
    /// Consumes the builder to create a new [Display] with an optional reset
    /// and backlight [OutputPin]. Blocks using the provided [DelayNs] `delay`
    /// for the duration of the power-on sequence.
    ///
    /// ### WARNING
    /// The reset pin needs to be in *high* state in order for the display to operate.
    /// If it wasn't provided the user needs to ensure this is the case.
    ///
    pub fn init(
        mut self,
        delay: &mut impl DelayNs,
    ) -> Result<Display<DI, RST, BL>, InitError<DI::Error>> {
        if let Some(size) = self.display_size {
            self.options.display_size = size;
        } else {
            let rotated = ModelOptions::with_rotation(self.options.rotation);
            self.options.display_size = rotated.display_size;
        }

        st7789::init(
            &mut self.di,
            &mut self.rst,
            &mut self.bl,
            delay,
            &self.options,
        )?;

        Ok(Display {
            di: self.di,
            rst: self.rst,
            bl: self.bl,
            options: self.options,
        })
    }
}

/// Error returned by [`Builder::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError<DiError> {
    /// Error caused by the display interface.
    Interface(DiError),
    /// Error driving the reset or backlight line.
    Pin(Line, ErrorKind),
    /// Invalid configuration error.
    ///
    /// This error is returned when the configuration passed to the builder is
    /// invalid. Detected before any bus traffic.
    InvalidConfiguration(ConfigurationError),
}

impl<DiError> From<DiError> for InitError<DiError> {
    fn from(value: DiError) -> Self {
        Self::Interface(value)
    }
}

/// Specifies which part of the configuration was invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum ConfigurationError {
    /// Invalid display size
    ///
    /// Width and height must be non-zero and fit the 240x320 frame memory
    /// in the orientation selected by the rotation.
    InvalidDisplaySize,
    /// Rotation index outside `0..=3`.
    InvalidRotation(u8),
}
