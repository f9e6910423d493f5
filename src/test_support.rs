//! Recording collaborators for unit tests.
//!
//! Bus, pins and delays push into one shared [`Log`] so tests can check the
//! exact interleaving of line changes, delays and transfers.

extern crate std;

use core::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use crate::interface::{Bus, Format, Line, NoPin, SpiInterface, WordSize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Frequency(u32),
    Format(Format),
    Bytes(Vec<u8>),
    Words(Vec<u16>),
    Pin(Line, bool),
    DelayUs(u32),
    DelayMs(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

#[derive(Default)]
struct State {
    events: Vec<Event>,
    writes: usize,
    fail_at: Option<usize>,
    fail_format: Option<WordSize>,
}

#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<State>>);

impl Log {
    fn push(&self, event: Event) {
        self.0.borrow_mut().events.push(event);
    }

    /// Make the `n`th bus write (0-based, bytes and words alike) fail.
    pub fn fail_write(&self, n: usize) {
        self.0.borrow_mut().fail_at = Some(n);
    }

    /// Make every switch to `word_size` frames fail.
    pub fn fail_format(&self, word_size: WordSize) {
        self.0.borrow_mut().fail_format = Some(word_size);
    }

    fn next_write_fails(&self) -> bool {
        let mut state = self.0.borrow_mut();
        let index = state.writes;
        state.writes += 1;
        state.fail_at == Some(index)
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().events.clear();
    }

    pub fn bus(&self) -> RecordingBus {
        RecordingBus { log: self.clone() }
    }

    pub fn pin(&self, line: Line) -> RecordingPin {
        RecordingPin {
            log: self.clone(),
            line,
        }
    }

    pub fn delay(&self) -> RecordingDelay {
        RecordingDelay { log: self.clone() }
    }

    /// Commands as `(opcode, parameters)`, decoded from the DC line state.
    pub fn commands(&self) -> Vec<(u8, Vec<u8>)> {
        let mut commands = Vec::new();
        let mut current: Option<(u8, Vec<u8>)> = None;
        let mut dc_high = true;

        for event in self.events() {
            match event {
                Event::Pin(Line::DataCommand, high) => dc_high = high,
                Event::Bytes(bytes) if !dc_high => {
                    commands.extend(current.take());
                    current = Some((bytes[0], bytes[1..].to_vec()));
                }
                Event::Bytes(bytes) => {
                    if let Some((_, params)) = current.as_mut() {
                        params.extend_from_slice(&bytes);
                    }
                }
                _ => {}
            }
        }
        commands.extend(current);
        commands
    }

    pub fn opcodes(&self) -> Vec<u8> {
        self.commands().into_iter().map(|(op, _)| op).collect()
    }

    pub fn opcode_count(&self, opcode: u8) -> usize {
        self.opcodes().into_iter().filter(|op| *op == opcode).count()
    }

    pub fn format_count(&self, word_size: WordSize) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Format(f) if f.word_size == word_size))
            .count()
    }

    pub fn words(&self) -> Vec<u16> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Words(words) => Some(words),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn words_written(&self) -> usize {
        self.words().len()
    }

    /// Index of the first event equal to `event`.
    pub fn position(&self, event: &Event) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

pub struct RecordingBus {
    log: Log,
}

impl Bus for RecordingBus {
    type Error = BusFault;

    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error> {
        self.log.push(Event::Frequency(hz));
        Ok(())
    }

    fn set_format(&mut self, format: Format) -> Result<(), Self::Error> {
        if self.log.0.borrow().fail_format == Some(format.word_size) {
            return Err(BusFault);
        }
        self.log.push(Event::Format(format));
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.log.next_write_fails() {
            return Err(BusFault);
        }
        self.log.push(Event::Bytes(bytes.to_vec()));
        Ok(())
    }

    fn write_words(&mut self, words: &[u16]) -> Result<(), Self::Error> {
        if self.log.next_write_fails() {
            return Err(BusFault);
        }
        self.log.push(Event::Words(words.to_vec()));
        Ok(())
    }
}

pub struct RecordingPin {
    log: Log,
    line: Line,
}

impl ErrorType for RecordingPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Pin(self.line, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Pin(self.line, true));
        Ok(())
    }
}

pub struct RecordingDelay {
    log: Log,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_us(&mut self, us: u32) {
        self.log.push(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::DelayMs(ms));
    }
}

pub type SharedInterface = SpiInterface<RecordingBus, RecordingPin, RecordingPin, RecordingDelay>;
pub type DedicatedInterface = SpiInterface<RecordingBus, RecordingPin, NoPin, RecordingDelay>;

pub fn shared_interface(log: &Log) -> SharedInterface {
    SpiInterface::with_chip_select(
        log.bus(),
        log.pin(Line::DataCommand),
        log.pin(Line::ChipSelect),
        log.delay(),
    )
}

pub fn dedicated_interface(log: &Log) -> DedicatedInterface {
    SpiInterface::new(log.bus(), log.pin(Line::DataCommand), log.delay())
}
