//! ST7789 command set.
//!
//! The opcodes follow the MIPI Display Command Set numbering. Every command
//! with parameters is a type that knows how to serialize them, so fixed-width
//! payloads can't be sent with the wrong length.

use crate::interface::Interface;
use crate::options::{ColorInversion, Rotation};

/// SWRESET: software reset
pub const SOFT_RESET: u8 = 0x01;
/// SLPOUT: leave sleep mode
pub const EXIT_SLEEP_MODE: u8 = 0x11;
/// NORON: normal display mode on
pub const ENTER_NORMAL_MODE: u8 = 0x13;
/// INVOFF: display inversion off
pub const EXIT_INVERT_MODE: u8 = 0x20;
/// INVON: display inversion on
pub const ENTER_INVERT_MODE: u8 = 0x21;
/// DISPON: display on
pub const SET_DISPLAY_ON: u8 = 0x29;
/// CASET: column address set
pub const SET_COLUMN_ADDRESS: u8 = 0x2a;
/// RASET: row address set
pub const SET_PAGE_ADDRESS: u8 = 0x2b;
/// RAMWR: memory write
pub const WRITE_MEMORY_START: u8 = 0x2c;
/// VSCRDEF: vertical scrolling definition
pub const SET_SCROLL_AREA: u8 = 0x33;
/// MADCTL: memory data access control
pub const SET_ADDRESS_MODE: u8 = 0x36;
/// VSCSAD: vertical scroll start address of RAM
pub const SET_SCROLL_START: u8 = 0x37;
/// COLMOD: interface pixel format
pub const SET_PIXEL_FORMAT: u8 = 0x3a;

/// COLMOD value: 65K colors on the RGB interface, 16 bit/pixel on the control
/// interface.
pub const PIXEL_FORMAT_RGB565: u8 = 0x55;

/// A command with typed parameters.
pub trait DcsCommand {
    /// Opcode byte.
    fn instruction(&self) -> u8;

    /// Serialize the parameters into `buffer`, returning the number of bytes used.
    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize;
}

/// Typed command helpers for any [`Interface`].
pub trait InterfaceExt: Interface {
    /// Send a typed command.
    fn write_command(&mut self, command: impl DcsCommand) -> Result<(), Self::Error> {
        let mut param_bytes = [0u8; 16];
        let n = command.fill_params_buf(&mut param_bytes);
        self.write_raw(command.instruction(), &param_bytes[..n])
    }

    /// Send an opcode with hand-assembled parameters.
    fn write_raw(&mut self, instruction: u8, param_bytes: &[u8]) -> Result<(), Self::Error> {
        self.send_command(instruction, param_bytes)
    }
}

impl<T: Interface + ?Sized> InterfaceExt for T {}

macro_rules! dcs_basic_command {
    (#[doc = $tt:expr] $instr_name:ident, $instr:expr) => {
        #[doc = $tt]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $instr_name;

        impl DcsCommand for $instr_name {
            fn instruction(&self) -> u8 {
                $instr
            }

            fn fill_params_buf(&self, _buffer: &mut [u8]) -> usize {
                0
            }
        }
    };
}

dcs_basic_command!(
    /// Software reset
    SoftReset,
    SOFT_RESET
);
dcs_basic_command!(
    /// Leave sleep mode
    ExitSleepMode,
    EXIT_SLEEP_MODE
);
dcs_basic_command!(
    /// Normal display mode on
    EnterNormalMode,
    ENTER_NORMAL_MODE
);
dcs_basic_command!(
    /// Turn the display on
    SetDisplayOn,
    SET_DISPLAY_ON
);
dcs_basic_command!(
    /// Start a memory write
    WriteMemoryStart,
    WRITE_MEMORY_START
);

fn fill_u16_pair(buffer: &mut [u8], a: u16, b: u16) -> usize {
    buffer[0..2].copy_from_slice(&a.to_be_bytes());
    buffer[2..4].copy_from_slice(&b.to_be_bytes());
    4
}

/// Set the first and last column of the address window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetColumnAddress {
    start: u16,
    end: u16,
}

impl SetColumnAddress {
    /// Columns `start..=end`.
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }
}

impl DcsCommand for SetColumnAddress {
    fn instruction(&self) -> u8 {
        SET_COLUMN_ADDRESS
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        fill_u16_pair(buffer, self.start, self.end)
    }
}

/// Set the first and last row of the address window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPageAddress {
    start: u16,
    end: u16,
}

impl SetPageAddress {
    /// Rows `start..=end`.
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }
}

impl DcsCommand for SetPageAddress {
    fn instruction(&self) -> u8 {
        SET_PAGE_ADDRESS
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        fill_u16_pair(buffer, self.start, self.end)
    }
}

/// Select which RAM row is shown on the first line of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetScrollStart(u16);

impl SetScrollStart {
    /// RAM row shown at the top.
    pub const fn new(row: u16) -> Self {
        Self(row)
    }
}

impl DcsCommand for SetScrollStart {
    fn instruction(&self) -> u8 {
        SET_SCROLL_START
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        buffer[0..2].copy_from_slice(&self.0.to_be_bytes());
        2
    }
}

/// Split the RAM rows into top fixed, scrolling and bottom fixed areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetScrollArea {
    top_fixed: u16,
    scroll: u16,
    bottom_fixed: u16,
}

impl SetScrollArea {
    /// The three heights must add up to the number of RAM rows.
    pub const fn new(top_fixed: u16, scroll: u16, bottom_fixed: u16) -> Self {
        Self {
            top_fixed,
            scroll,
            bottom_fixed,
        }
    }
}

impl DcsCommand for SetScrollArea {
    fn instruction(&self) -> u8 {
        SET_SCROLL_AREA
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        buffer[0..2].copy_from_slice(&self.top_fixed.to_be_bytes());
        buffer[2..4].copy_from_slice(&self.scroll.to_be_bytes());
        buffer[4..6].copy_from_slice(&self.bottom_fixed.to_be_bytes());
        6
    }
}

/// Memory access order (MADCTL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetAddressMode(u8);

impl SetAddressMode {
    /// Raw MADCTL byte.
    pub const fn new(madctl: u8) -> Self {
        Self(madctl)
    }

    /// The MADCTL byte.
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl From<Rotation> for SetAddressMode {
    fn from(rotation: Rotation) -> Self {
        Self(rotation.madctl())
    }
}

impl DcsCommand for SetAddressMode {
    fn instruction(&self) -> u8 {
        SET_ADDRESS_MODE
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        buffer[0] = self.0;
        1
    }
}

/// Interface pixel format (COLMOD).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPixelFormat(u8);

impl SetPixelFormat {
    /// 16 bit/pixel RGB565, the only format this driver streams.
    pub const fn rgb565() -> Self {
        Self(PIXEL_FORMAT_RGB565)
    }
}

impl DcsCommand for SetPixelFormat {
    fn instruction(&self) -> u8 {
        SET_PIXEL_FORMAT
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        buffer[0] = self.0;
        1
    }
}

/// Display inversion on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetInvertMode(ColorInversion);

impl SetInvertMode {
    /// Pick INVON or INVOFF.
    pub const fn new(inversion: ColorInversion) -> Self {
        Self(inversion)
    }
}

impl DcsCommand for SetInvertMode {
    fn instruction(&self) -> u8 {
        match self.0 {
            ColorInversion::Normal => EXIT_INVERT_MODE,
            ColorInversion::Inverted => ENTER_INVERT_MODE,
        }
    }

    fn fill_params_buf(&self, _buffer: &mut [u8]) -> usize {
        0
    }
}
