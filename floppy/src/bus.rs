// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Bus-discipline dependent line lookup.
//!
//! The same four SELECT/MOTOR wires carry two different disciplines. On an
//! IBM/PC twisted cable two units get a select and a motor line each; on a
//! straight Shugart cable up to three units get selects and share a single
//! motor line. Invalid `(bus, unit)` combinations are rejected here, at the
//! table boundary.

/// The cabling discipline the probe is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bus {
    IbmPc,
    Shugart,
}

/// Resolved motor line: the external pin to toggle and the unit slot that
/// tracks its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorLine {
    /// Index into the per-unit state array. Shugart aliases every unit to
    /// slot 0 because the cable has one shared motor wire.
    pub unit: usize,
    /// External floppy-cable pin number.
    pub pin_id: u8,
}

/// Highest number of units any discipline supports.
pub const MAX_UNITS: usize = 3;

// External pin numbers, indexed by unit number.
const IBMPC_SELECT: [u8; 2] = [14, 12];
const IBMPC_MOTOR: [u8; 2] = [10, 16];
const SHUGART_SELECT: [u8; 3] = [10, 12, 14];
const SHUGART_MOTOR_PIN: u8 = 16;

impl Bus {
    /// SELECT line for `unit`, or `None` when the unit does not exist on
    /// this discipline.
    pub fn select_pin(self, unit: u8) -> Option<u8> {
        let table: &[u8] = match self {
            Bus::IbmPc => &IBMPC_SELECT,
            Bus::Shugart => &SHUGART_SELECT,
        };
        table.get(unit as usize).copied()
    }

    /// MOTOR line for `unit`, with the unit slot the caller must use for
    /// state tracking.
    pub fn motor_line(self, unit: u8) -> Option<MotorLine> {
        match self {
            Bus::IbmPc => IBMPC_MOTOR.get(unit as usize).map(|&pin_id| MotorLine {
                unit: unit as usize,
                pin_id,
            }),
            Bus::Shugart => {
                if (unit as usize) < SHUGART_SELECT.len() {
                    // One shared motor wire; track it on slot 0.
                    Some(MotorLine {
                        unit: 0,
                        pin_id: SHUGART_MOTOR_PIN,
                    })
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ibmpc_select_routing() {
        assert_eq!(Bus::IbmPc.select_pin(0), Some(14));
        assert_eq!(Bus::IbmPc.select_pin(1), Some(12));
        assert_eq!(Bus::IbmPc.select_pin(2), None);
        assert_eq!(Bus::IbmPc.select_pin(5), None);
    }

    #[test]
    fn shugart_select_routing() {
        assert_eq!(Bus::Shugart.select_pin(0), Some(10));
        assert_eq!(Bus::Shugart.select_pin(1), Some(12));
        assert_eq!(Bus::Shugart.select_pin(2), Some(14));
        assert_eq!(Bus::Shugart.select_pin(3), None);
    }

    #[test]
    fn ibmpc_motor_routing() {
        assert_eq!(
            Bus::IbmPc.motor_line(0),
            Some(MotorLine { unit: 0, pin_id: 10 })
        );
        assert_eq!(
            Bus::IbmPc.motor_line(1),
            Some(MotorLine { unit: 1, pin_id: 16 })
        );
        assert_eq!(Bus::IbmPc.motor_line(2), None);
    }

    #[test]
    fn shugart_motor_aliases_to_slot_zero() {
        for unit in 0..3 {
            assert_eq!(
                Bus::Shugart.motor_line(unit),
                Some(MotorLine { unit: 0, pin_id: 16 })
            );
        }
        assert_eq!(Bus::Shugart.motor_line(3), None);
    }
}
