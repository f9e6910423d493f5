//! No-op collaborators for doc examples.

use core::convert::Infallible;

use embedded_hal::{delay::DelayNs, digital};

use crate::{
    interface::{Bus, Format, SpiInterface},
    Builder, Display,
};

/// Mock display built on [`MockBus`] with chip select, reset and backlight pins.
pub type MockDisplay = Display<
    SpiInterface<MockBus, MockOutputPin, MockOutputPin, MockDelay>,
    MockOutputPin,
    MockOutputPin,
>;

/// Builds and initializes a 240x320 [`MockDisplay`].
pub fn new_mock_display() -> MockDisplay {
    let di = SpiInterface::with_chip_select(MockBus, MockOutputPin, MockOutputPin, MockDelay);
    Builder::new(di)
        .reset_pin(MockOutputPin)
        .backlight_pin(MockOutputPin)
        .display_size(240, 320)
        .init(&mut MockDelay)
        .unwrap()
}

/// Bus that accepts everything.
pub struct MockBus;

impl Bus for MockBus {
    type Error = Infallible;

    fn set_frequency(&mut self, _hz: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_format(&mut self, _format: Format) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write(&mut self, _bytes: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write_words(&mut self, _words: &[u16]) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Output pin that ignores level changes.
pub struct MockOutputPin;

impl digital::OutputPin for MockOutputPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl digital::ErrorType for MockOutputPin {
    type Error = Infallible;
}

/// Delay that returns immediately.
pub struct MockDelay;

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
