// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Index-pulse interrupt wiring.
//!
//! The index line (PB10) fires EXTI line 10, which lands on the shared
//! EXTI15_10 vector (position 40). This module only connects the
//! peripheral to the vector; what happens per revolution is decided by
//! whoever installs the hook.

use core::cell::Cell;

use cortex_m::interrupt::Mutex;
use stm32f1xx_hal::{
    afio,
    gpio::{gpiob, Edge, ExtiPin, Floating, Input},
    pac::{self, interrupt, EXTI, NVIC},
};

static INDEX_HOOK: Mutex<Cell<Option<fn()>>> = Mutex::new(Cell::new(None));

/// Install the handler run on every index pulse. Install before calling
/// [`arm`]; a pulse with no hook installed is ignored.
pub fn on_index_pulse(hook: fn()) {
    cortex_m::interrupt::free(|cs| INDEX_HOOK.borrow(cs).set(Some(hook)));
}

/// Route the index pin to EXTI10 on the falling (asserted) edge and
/// unmask the vector.
pub fn arm(pin: &mut gpiob::PB10<Input<Floating>>, afio: &mut afio::Parts, exti: &mut EXTI) {
    pin.make_interrupt_source(afio);
    pin.trigger_on_edge(exti, Edge::Falling);
    pin.enable_interrupt(exti);
    unsafe { NVIC::unmask(pac::Interrupt::EXTI15_10) };
}

#[interrupt]
fn EXTI15_10() {
    // EXTI10 is the only line armed on this vector.
    unsafe { (*EXTI::ptr()).pr.write(|w| w.pr10().set_bit()) };
    if let Some(hook) = cortex_m::interrupt::free(|cs| INDEX_HOOK.borrow(cs).get()) {
        hook();
    }
}
