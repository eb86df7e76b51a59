// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Floppy Bus Logic
//!
//! This crate contains the drive-bus logic for the fluxprobe floppy probe:
//! everything about the floppy interface that is not tied to a specific MCU
//! peripheral. The board crate (`fluxprobe`) injects real GPIO pins and a
//! delay source through the `embedded-hal` traits; host tests inject mocks.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`ack`] | Host acknowledgement codes and command errors |
//! | [`pins`] | Active-low line polarity boundary and pin-map tables |
//! | [`bus`] | IBM/PC vs Shugart select/motor line lookup |
//! | [`ctrl`] | Drive selection state machine and auxiliary pin surface |
//! | [`flux`] | SAMPLE-rate timing math and flux ring arithmetic |
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod ack;
pub mod bus;
pub mod ctrl;
pub mod flux;
pub mod pins;

pub use ack::{Ack, CmdError};
pub use bus::Bus;
pub use ctrl::{DelayParams, FloppyController};
pub use pins::{BusPin, Level, PinMap};
