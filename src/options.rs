//! [ModelOptions] and other helper types.

use crate::builder::ConfigurationError;

/// Long side of the ST7789 frame memory.
pub const RAM_ROWS: u16 = 320;
/// Short side of the ST7789 frame memory.
pub const RAM_COLUMNS: u16 = 240;

/// Bus clock requested by default. The bus implementation clamps it to the
/// closest rate it can generate.
pub const DEFAULT_BUS_FREQUENCY: u32 = 125_000_000;

/// Display rotation.
///
/// Selects the MADCTL byte written once during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// No rotation.
    #[default]
    Deg0,
    /// 90° clockwise rotation (row/column exchange, column order reversed).
    Deg90,
    /// 180° clockwise rotation.
    Deg180,
    /// 270° clockwise rotation.
    Deg270,
}

impl Rotation {
    /// MADCTL byte (MY, MX, MV bits) for this rotation.
    pub const fn madctl(self) -> u8 {
        match self {
            Rotation::Deg0 => 0x00,
            Rotation::Deg90 => 0x60,
            Rotation::Deg180 => 0xc0,
            Rotation::Deg270 => 0xa0,
        }
    }

    /// Returns `true` if rows and columns are exchanged.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl TryFrom<u8> for Rotation {
    type Error = ConfigurationError;

    /// Rotation from a table index, `0..=3` in steps of 90°.
    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Rotation::Deg0),
            1 => Ok(Rotation::Deg90),
            2 => Ok(Rotation::Deg180),
            3 => Ok(Rotation::Deg270),
            other => Err(ConfigurationError::InvalidRotation(other)),
        }
    }
}

/// Color inversion.
///
/// Most ST7789 modules use IPS panels that need inversion on to show colors
/// correctly, hence the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorInversion {
    /// INVOFF
    Normal,
    /// INVON
    #[default]
    Inverted,
}

/// [ModelOptions] are passed to the initialization sequence. They are set by
/// the [`Builder`](crate::Builder) and fixed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOptions {
    /// Width and height in pixels, as seen after rotation
    pub display_size: (u16, u16),
    /// Memory access order
    pub rotation: Rotation,
    /// Color inversion
    pub invert_colors: ColorInversion,
    /// Requested bus clock
    pub bus_frequency: u32,
}

impl ModelOptions {
    /// Full-frame defaults for the given rotation.
    pub fn with_rotation(rotation: Rotation) -> Self {
        let display_size = if rotation.is_vertical() {
            (RAM_ROWS, RAM_COLUMNS)
        } else {
            (RAM_COLUMNS, RAM_ROWS)
        };

        Self {
            display_size,
            rotation,
            invert_colors: ColorInversion::default(),
            bus_frequency: DEFAULT_BUS_FREQUENCY,
        }
    }

    /// Checks that the geometry fits the frame memory as oriented by the
    /// rotation.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let (w, h) = self.display_size;
        let (max_w, max_h) = if self.rotation.is_vertical() {
            (RAM_ROWS, RAM_COLUMNS)
        } else {
            (RAM_COLUMNS, RAM_ROWS)
        };
        if w == 0 || h == 0 || w > max_w || h > max_h {
            return Err(ConfigurationError::InvalidDisplaySize);
        }
        Ok(())
    }
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self::with_rotation(Rotation::default())
    }
}
