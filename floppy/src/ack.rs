// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Acknowledgement codes returned to the host for every bus command.

/// One-byte acknowledgement code, as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Ack {
    Okay = 0,
    BadUnit = 1,
    BadPin = 2,
    NoBus = 3,
}

impl Ack {
    /// Wire encoding of this acknowledgement.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Failure half of a bus command. `Ok(())` maps to [`Ack::Okay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdError {
    /// Requested unit is out of range for the current bus discipline.
    BadUnit,
    /// Unknown external pin id.
    BadPin,
    /// No bus discipline has been configured yet.
    NoBus,
}

impl From<CmdError> for Ack {
    fn from(e: CmdError) -> Self {
        match e {
            CmdError::BadUnit => Ack::BadUnit,
            CmdError::BadPin => Ack::BadPin,
            CmdError::NoBus => Ack::NoBus,
        }
    }
}

impl From<Result<(), CmdError>> for Ack {
    fn from(r: Result<(), CmdError>) -> Self {
        match r {
            Ok(()) => Ack::Okay,
            Err(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes() {
        assert_eq!(Ack::Okay.code(), 0);
        assert_eq!(Ack::BadUnit.code(), 1);
        assert_eq!(Ack::BadPin.code(), 2);
        assert_eq!(Ack::NoBus.code(), 3);
    }

    #[test]
    fn result_conversion() {
        assert_eq!(Ack::from(Ok(())), Ack::Okay);
        assert_eq!(Ack::from(Err(CmdError::BadPin)), Ack::BadPin);
        assert_eq!(Ack::from(Err(CmdError::NoBus)), Ack::NoBus);
    }
}
