// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Drive selection state machine and auxiliary pin surface.
//!
//! All mutable bus state lives in one [`FloppyController`], constructed once
//! at boot from the board's pins and delay source. Host commands land here;
//! the controller decides which external line to touch via the
//! [`Bus`](crate::bus::Bus) tables and leaves the actual electrical levels
//! to the [`PinMap`] boundary.

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::ack::CmdError;
use crate::bus::{Bus, MAX_UNITS};
use crate::pins::{input_level, Level, PinMap};

/// External pin number of the one sensor line the host may read back.
pub const SENSE_PIN_ID: u8 = 34;

/// Settle time after toggling the flippy track-0 override, µs.
const FLIPPY_SETTLE_US: u32 = 10;

/// Post-command settle times, host-tunable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayParams {
    /// Wait after asserting SELECT, µs.
    pub select_delay: u32,
    /// Spin-up wait after asserting MOTOR, ms.
    pub motor_delay: u32,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            select_delay: 10,
            motor_delay: 750,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct UnitState {
    motor: bool,
}

/// The floppy bus controller: selection state machine, per-unit motor
/// tracking, user pins, and the flippy sensor probe.
pub struct FloppyController<P, I, D> {
    msel: PinMap<P, 4>,
    user: PinMap<P, 3>,
    flippy_override: P,
    trk0: I,
    sense: I,
    delay: D,
    delays: DelayParams,
    bus: Option<Bus>,
    unit_nr: Option<u8>,
    units: [UnitState; MAX_UNITS],
}

impl<P, I, D> FloppyController<P, I, D>
where
    P: OutputPin,
    I: InputPin,
    D: DelayUs<u32> + DelayMs<u32>,
{
    /// Build the controller from configured board pins. All outputs are
    /// expected to start in the released state and the flippy override
    /// low, which is how the board init leaves them.
    pub fn new(
        msel: PinMap<P, 4>,
        user: PinMap<P, 3>,
        flippy_override: P,
        trk0: I,
        sense: I,
        delay: D,
    ) -> Self {
        Self {
            msel,
            user,
            flippy_override,
            trk0,
            sense,
            delay,
            delays: DelayParams::default(),
            bus: None,
            unit_nr: None,
            units: [UnitState::default(); MAX_UNITS],
        }
    }

    /// Configure the cabling discipline. Drops any current selection first
    /// so no select line stays asserted under the old pin mapping.
    pub fn set_bus(&mut self, bus: Option<Bus>) {
        self.drive_deselect();
        self.bus = bus;
    }

    pub fn bus(&self) -> Option<Bus> {
        self.bus
    }

    pub fn set_delays(&mut self, delays: DelayParams) {
        self.delays = delays;
    }

    pub fn delays(&self) -> DelayParams {
        self.delays
    }

    pub fn selected_unit(&self) -> Option<u8> {
        self.unit_nr
    }

    /// Tracked motor state for a unit slot.
    pub fn motor_state(&self, slot: usize) -> bool {
        self.units.get(slot).map(|u| u.motor).unwrap_or(false)
    }

    /// Select drive `nr`, deselecting any other unit first. Selecting the
    /// current unit again is a no-op. Caller errors leave the current
    /// selection untouched.
    pub fn drive_select(&mut self, nr: u8) -> Result<(), CmdError> {
        if self.unit_nr == Some(nr) {
            return Ok(());
        }

        let bus = self.bus.ok_or(CmdError::NoBus)?;
        let pin = bus.select_pin(nr).ok_or(CmdError::BadUnit)?;

        self.drive_deselect();
        self.msel
            .drive(pin, Level::Asserted)
            .map_err(|_| CmdError::BadUnit)?;

        self.unit_nr = Some(nr);
        self.delay.delay_us(self.delays.select_delay);
        Ok(())
    }

    /// Release the SELECT line of the current unit, if any.
    ///
    /// A selected unit always has a resolvable select line; failing to
    /// release it means the recorded state no longer matches the hardware,
    /// and the probe halts rather than keep driving a bus it has lost
    /// track of.
    pub fn drive_deselect(&mut self) {
        let Some(nr) = self.unit_nr else {
            return;
        };
        let pin = self
            .bus
            .and_then(|bus| bus.select_pin(nr))
            .expect("selected unit has no select line");
        self.msel
            .drive(pin, Level::Released)
            .expect("select line missing from the msel table");
        self.unit_nr = None;
    }

    /// Switch the motor of unit `nr` on or off. Repeating the current
    /// state touches nothing and returns immediately.
    pub fn drive_motor(&mut self, nr: u8, on: bool) -> Result<(), CmdError> {
        let bus = self.bus.ok_or(CmdError::NoBus)?;
        let line = bus.motor_line(nr).ok_or(CmdError::BadUnit)?;

        if self.units[line.unit].motor == on {
            return Ok(());
        }

        let level = if on { Level::Asserted } else { Level::Released };
        self.msel
            .drive(line.pin_id, level)
            .map_err(|_| CmdError::BadUnit)?;

        self.units[line.unit].motor = on;
        if on {
            self.delay.delay_ms(self.delays.motor_delay);
        }
        Ok(())
    }

    /// Drive one of the user-auxiliary lines.
    pub fn set_user_pin(&mut self, pin_id: u8, level: Level) -> Result<(), CmdError> {
        self.user.drive(pin_id, level)
    }

    /// Release every user-auxiliary line.
    pub fn reset_user_pins(&mut self) {
        self.user.release_all();
    }

    /// Read back a sensor line. Only external pin 34 is wired for
    /// read-back on this board.
    pub fn read_pin(&mut self, pin_id: u8) -> Result<Level, CmdError> {
        if pin_id != SENSE_PIN_ID {
            return Err(CmdError::BadPin);
        }
        Ok(input_level(&self.sense))
    }

    /// Probe for flippy-modified media: force the track-0 sensor override
    /// high, wait for it to settle, and see whether track-0 followed. The
    /// override is restored (and settled) before returning.
    pub fn flippy_detect(&mut self) -> bool {
        self.flippy_override.set_high().ok();
        self.delay.delay_us(FLIPPY_SETTLE_US);

        let is_flippy = self.trk0.is_high().unwrap_or(false);

        self.flippy_override.set_low().ok();
        self.delay.delay_us(FLIPPY_SETTLE_US);
        is_flippy
    }
}
