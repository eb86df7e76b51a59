// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Polarity boundary and external-pin lookup tables.
//!
//! The floppy bus is active-low: a line is *asserted* by driving it to
//! electrical 0. That convention stays inside [`BusPin`]; everything above
//! this module speaks in [`Level`] terms only.

use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::ack::CmdError;

/// Logical level of a floppy bus line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// The line is active (electrically low on the cable).
    Asserted,
    /// The line is idle (electrically high on the cable).
    Released,
}

impl Level {
    /// Level requested by a host byte: nonzero asserts the line.
    #[inline]
    pub const fn from_host(raw: u8) -> Self {
        if raw != 0 {
            Level::Asserted
        } else {
            Level::Released
        }
    }

    #[inline]
    pub const fn is_asserted(self) -> bool {
        matches!(self, Level::Asserted)
    }
}

/// An active-low bus output, generic over any GPIO pin.
///
/// This is the only place where [`Level`] is translated to an electrical
/// pin state.
pub struct BusPin<P> {
    pin: P,
}

impl<P: OutputPin> BusPin<P> {
    /// Wrap a pin that has already been configured as an output and left
    /// in the released (high) state.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Drive the line to the requested logical level.
    pub fn drive(&mut self, level: Level) {
        match level {
            Level::Asserted => self.pin.set_low().ok(),
            Level::Released => self.pin.set_high().ok(),
        };
    }

    pub fn free(self) -> P {
        self.pin
    }
}

/// Read the logical level of an active-low bus input.
pub fn input_level<I: InputPin>(pin: &I) -> Level {
    if pin.is_low().unwrap_or(false) {
        Level::Asserted
    } else {
        Level::Released
    }
}

/// One entry of an external-pin table: a floppy-cable pin number and the
/// MCU line it lands on.
pub struct PinMapping<P> {
    pin_id: u8,
    pin: BusPin<P>,
}

/// Fixed-size table mapping external floppy-cable pin numbers to GPIO
/// outputs. Lookup is a linear scan; the tables hold at most a handful of
/// entries.
pub struct PinMap<P, const N: usize> {
    entries: [PinMapping<P>; N],
}

impl<P: OutputPin, const N: usize> PinMap<P, N> {
    pub fn new(entries: [(u8, P); N]) -> Self {
        Self {
            entries: entries.map(|(pin_id, pin)| PinMapping {
                pin_id,
                pin: BusPin::new(pin),
            }),
        }
    }

    /// Drive the mapped line for `pin_id`, or report `BadPin` for an id
    /// that is not in this table.
    pub fn drive(&mut self, pin_id: u8, level: Level) -> Result<(), CmdError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.pin_id == pin_id)
            .ok_or(CmdError::BadPin)?;
        entry.pin.drive(level);
        Ok(())
    }

    /// Release every line in the table.
    pub fn release_all(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.pin.drive(Level::Released);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        states: Vec<bool>, // electrical levels written, true = high
    }

    struct TestPin(Rc<RefCell<Recorder>>);

    impl OutputPin for TestPin {
        type Error = Infallible;
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().states.push(false);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().states.push(true);
            Ok(())
        }
    }

    #[test]
    fn bus_pin_inverts() {
        let rec = Rc::new(RefCell::new(Recorder::default()));
        let mut pin = BusPin::new(TestPin(rec.clone()));
        pin.drive(Level::Asserted);
        pin.drive(Level::Released);
        assert_eq!(rec.borrow().states, vec![false, true]);
    }

    #[test]
    fn map_hits_and_misses() {
        let rec = Rc::new(RefCell::new(Recorder::default()));
        let mut map = PinMap::new([(10, TestPin(rec.clone())), (12, TestPin(rec.clone()))]);
        assert_eq!(map.drive(12, Level::Asserted), Ok(()));
        assert_eq!(map.drive(11, Level::Asserted), Err(CmdError::BadPin));
        assert_eq!(rec.borrow().states, vec![false]);
    }

    #[test]
    fn release_all_releases_every_entry() {
        let rec = Rc::new(RefCell::new(Recorder::default()));
        let mut map = PinMap::new([(2, TestPin(rec.clone())), (4, TestPin(rec.clone()))]);
        map.release_all();
        assert_eq!(rec.borrow().states, vec![true, true]);
    }

    #[test]
    fn host_byte_levels() {
        assert_eq!(Level::from_host(0), Level::Released);
        assert_eq!(Level::from_host(1), Level::Asserted);
        assert!(Level::from_host(0xff).is_asserted());
    }
}
