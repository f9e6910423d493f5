//! ST7789 power-on sequence.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};

use crate::builder::InitError;
use crate::dcs::{
    EnterNormalMode, ExitSleepMode, InterfaceExt, SetAddressMode, SetColumnAddress,
    SetDisplayOn, SetInvertMode, SetPageAddress, SetPixelFormat, SoftReset,
};
use crate::interface::{Interface, Line};
use crate::options::ModelOptions;

/// Hold after the control lines settle, before the first command.
const RESET_HOLD_MS: u32 = 100;
/// SWRESET reloads every register; the chip ignores commands meanwhile.
const SOFT_RESET_MS: u32 = 150;
const SLEEP_OUT_MS: u32 = 50;
const COMMAND_MS: u32 = 10;

/// Bring the controller from an unknown state to displaying, then switch the
/// backlight on.
///
/// Every delay is required. Shortening them, especially the reset hold and
/// the software reset wait, gives intermittently corrupted or blank screens
/// at power-up.
pub(crate) fn init<DI, RST, BL, D>(
    di: &mut DI,
    rst: &mut RST,
    bl: &mut BL,
    delay: &mut D,
    options: &ModelOptions,
) -> Result<(), InitError<DI::Error>>
where
    DI: Interface,
    RST: OutputPin,
    BL: OutputPin,
    D: DelayNs,
{
    options
        .validate()
        .map_err(InitError::InvalidConfiguration)?;
    let (width, height) = options.display_size;

    log::debug!(
        "st7789 init: {}x{}, {:?}, {:?}",
        width,
        height,
        options.rotation,
        options.invert_colors
    );

    di.init(options.bus_frequency)?;
    rst.set_high()
        .map_err(|e| InitError::Pin(Line::Reset, e.kind()))?;
    delay.delay_ms(RESET_HOLD_MS);

    di.write_command(SoftReset)?;
    delay.delay_ms(SOFT_RESET_MS);

    di.write_command(ExitSleepMode)?;
    delay.delay_ms(SLEEP_OUT_MS);

    di.write_command(SetPixelFormat::rgb565())?;
    delay.delay_ms(COMMAND_MS);

    di.write_command(SetAddressMode::from(options.rotation))?;
    di.write_command(SetColumnAddress::new(0, width - 1))?;
    di.write_command(SetPageAddress::new(0, height - 1))?;

    di.write_command(SetInvertMode::new(options.invert_colors))?;
    delay.delay_ms(COMMAND_MS);

    di.write_command(EnterNormalMode)?;
    delay.delay_ms(COMMAND_MS);

    di.write_command(SetDisplayOn)?;
    delay.delay_ms(COMMAND_MS);

    bl.set_high()
        .map_err(|e| InitError::Pin(Line::Backlight, e.kind()))?;
    log::debug!("st7789 init done");
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;
    use std::vec::Vec;

    use super::*;
    use crate::interface::SpiError;
    use crate::options::{ColorInversion, Rotation};
    use crate::test_support::{dedicated_interface, shared_interface, BusFault, Event, Log};

    fn run(log: &Log, options: &ModelOptions) -> Result<(), InitError<SpiError<BusFault>>> {
        let mut di = shared_interface(log);
        init(
            &mut di,
            &mut log.pin(Line::Reset),
            &mut log.pin(Line::Backlight),
            &mut log.delay(),
            options,
        )
    }

    fn options(width: u16, height: u16, rotation: Rotation) -> ModelOptions {
        let mut options = ModelOptions::with_rotation(rotation);
        options.display_size = (width, height);
        options
    }

    #[test]
    fn command_script_for_240x320() {
        let log = Log::default();
        run(&log, &options(240, 320, Rotation::Deg0)).unwrap();

        assert_eq!(
            log.commands(),
            vec![
                (0x01, Vec::new()),
                (0x11, Vec::new()),
                (0x3a, vec![0x55]),
                (0x36, vec![0x00]),
                (0x2a, vec![0, 0, 0, 239]),
                (0x2b, vec![0, 0, 1, 63]),
                (0x21, Vec::new()),
                (0x13, Vec::new()),
                (0x29, Vec::new()),
            ]
        );
    }

    #[test]
    fn waits_between_commands() {
        let log = Log::default();
        run(&log, &options(240, 240, Rotation::Deg90)).unwrap();

        let millis: Vec<u32> = log
            .events()
            .into_iter()
            .filter_map(|e| match e {
                Event::DelayMs(ms) => Some(ms),
                _ => None,
            })
            .collect();
        assert_eq!(millis, [100, 150, 50, 10, 10, 10, 10]);
        assert_eq!(log.commands()[3], (0x36, vec![0x60]));
    }

    #[test]
    fn lines_idle_before_reset_hold() {
        let log = Log::default();
        run(&log, &ModelOptions::default()).unwrap();

        let events = log.events();
        let hold = log.position(&Event::DelayMs(100)).unwrap();
        assert_eq!(
            &events[hold - 3..hold],
            &[
                Event::Pin(Line::ChipSelect, true),
                Event::Pin(Line::DataCommand, true),
                Event::Pin(Line::Reset, true),
            ]
        );
    }

    #[test]
    fn backlight_comes_on_last() {
        let log = Log::default();
        run(&log, &ModelOptions::default()).unwrap();

        let events = log.events();
        assert_eq!(events.last(), Some(&Event::Pin(Line::Backlight, true)));
        let backlight = events.len() - 1;
        let display_on = events
            .iter()
            .rposition(|e| *e == Event::Bytes(vec![0x29]))
            .unwrap();
        assert!(display_on < backlight);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, Event::Pin(Line::Backlight, _)))
                .count(),
            1
        );
    }

    #[test]
    fn normal_colors_send_invoff() {
        let log = Log::default();
        let mut options = ModelOptions::default();
        options.invert_colors = ColorInversion::Normal;
        run(&log, &options).unwrap();

        assert_eq!(log.opcode_count(0x20), 1);
        assert_eq!(log.opcode_count(0x21), 0);
    }

    #[test]
    fn dedicated_bus_runs_same_script() {
        let log = Log::default();
        let mut di = dedicated_interface(&log);
        init(
            &mut di,
            &mut log.pin(Line::Reset),
            &mut log.pin(Line::Backlight),
            &mut log.delay(),
            &ModelOptions::default(),
        )
        .unwrap();

        assert_eq!(
            log.opcodes(),
            [0x01, 0x11, 0x3a, 0x36, 0x2a, 0x2b, 0x21, 0x13, 0x29]
        );
    }

    #[test]
    fn bus_failure_stops_the_script() {
        let log = Log::default();
        log.fail_write(2);

        let result = run(&log, &ModelOptions::default());

        assert!(matches!(result, Err(InitError::Interface(_))));
        assert_eq!(log.opcodes(), [0x01, 0x11]);
        assert!(log.position(&Event::Pin(Line::Backlight, true)).is_none());
    }
}
