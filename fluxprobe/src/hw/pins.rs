// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the AT32F415 floppy probe board.
//!
//! External floppy-cable pin numbers map onto the MCU as follows:
//! SELECT/MOTOR {10 → A3, 12 → B9, 14 → A4, 16 → A1}, user pins
//! {2 → A6, 4 → A5, 6 → A7}, readable sensor 34 → B15. RDATA arrives on
//! PA15 (TIM2 ch.1 after partial remap 1), WDATA leaves on PA2 (TIM2
//! ch.3), and the index pulse lands on PB10 (EXTI10).

use floppy::pins::{BusPin, PinMap};
use stm32f1xx_hal::{
    afio,
    gpio::{
        gpioa, gpiob, Alternate, ErasedPin, Floating, IOPinSpeed, Input, Output, OutputSpeed,
        PinState, PushPull,
    },
    pac,
};

type OutPin = ErasedPin<Output<PushPull>>;
type InPin = ErasedPin<Input<Floating>>;

/// Debug console pins (USART1).
pub struct UsartPins {
    pub tx: gpioa::PA9<Alternate<PushPull>>,
    pub rx: gpioa::PA10<Input<Floating>>,
}

/// Head-positioning and write-gate lines. Sequencing belongs to the layer
/// above; these are plain released-idle bus outputs.
pub struct HeadControl {
    pub dir: BusPin<OutPin>,
    pub step: BusPin<OutPin>,
    pub wgate: BusPin<OutPin>,
    pub head: BusPin<OutPin>,
}

/// All board pins. Construct this once at startup using:
///
/// ```rust
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, &mut afio.mapr);
/// ```
pub struct BoardPins {
    pub msel: PinMap<OutPin, 4>,
    pub user: PinMap<OutPin, 3>,
    /// Track-0 sensor override (PB14), idle low.
    pub flippy_override: OutPin,
    pub trk0: InPin,
    pub wrprot: InPin,
    /// External pin 34 read-back (PB15).
    pub sense: InPin,
    pub index: gpiob::PB10<Input<Floating>>,
    pub heads: HeadControl,
    /// Held only so nothing reconfigures it; TIM2 samples it directly.
    pub rdata: gpioa::PA15<Input<Floating>>,
    pub wdata: gpioa::PA2<Alternate<PushPull>>,
    pub usart: UsartPins,
}

impl BoardPins {
    /// Configure every floppy-interface pin and build the lookup tables.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, mapr: &mut afio::MAPR) -> Self {
        let mut gpioa = gpioa.split();
        let mut gpiob = gpiob.split();

        // PA15/PB3/PB4 double as JTAG; give up JTAG (SWD stays) to use
        // them as RDATA, WRPROT and TRK0.
        let (pa15, pb3, pb4) = mapr.disable_jtag(gpioa.pa15, gpiob.pb3, gpiob.pb4);

        // Route PA15 to TIM2 ch.1 (partial remap 1).
        mapr.modify_mapr(|_, w| unsafe { w.tim2_remap().bits(0b01) });

        // SELECT/MOTOR group: 2 MHz push-pull, idle released (high).
        let mut msel10 = gpioa
            .pa3
            .into_push_pull_output_with_state(&mut gpioa.crl, PinState::High);
        msel10.set_speed(&mut gpioa.crl, IOPinSpeed::Mhz2);
        let mut msel12 = gpiob
            .pb9
            .into_push_pull_output_with_state(&mut gpiob.crh, PinState::High);
        msel12.set_speed(&mut gpiob.crh, IOPinSpeed::Mhz2);
        let mut msel14 = gpioa
            .pa4
            .into_push_pull_output_with_state(&mut gpioa.crl, PinState::High);
        msel14.set_speed(&mut gpioa.crl, IOPinSpeed::Mhz2);
        let mut msel16 = gpioa
            .pa1
            .into_push_pull_output_with_state(&mut gpioa.crl, PinState::High);
        msel16.set_speed(&mut gpioa.crl, IOPinSpeed::Mhz2);

        // User-modifiable pins, same drive.
        let mut user2 = gpioa
            .pa6
            .into_push_pull_output_with_state(&mut gpioa.crl, PinState::High);
        user2.set_speed(&mut gpioa.crl, IOPinSpeed::Mhz2);
        let mut user4 = gpioa
            .pa5
            .into_push_pull_output_with_state(&mut gpioa.crl, PinState::High);
        user4.set_speed(&mut gpioa.crl, IOPinSpeed::Mhz2);
        let mut user6 = gpioa
            .pa7
            .into_push_pull_output_with_state(&mut gpioa.crl, PinState::High);
        user6.set_speed(&mut gpioa.crl, IOPinSpeed::Mhz2);

        // Head positioning and write gate, idle released.
        let mut dir = gpiob
            .pb8
            .into_push_pull_output_with_state(&mut gpiob.crh, PinState::High);
        dir.set_speed(&mut gpiob.crh, IOPinSpeed::Mhz2);
        let mut step = gpiob
            .pb6
            .into_push_pull_output_with_state(&mut gpiob.crl, PinState::High);
        step.set_speed(&mut gpiob.crl, IOPinSpeed::Mhz2);
        let mut wgate = gpiob
            .pb7
            .into_push_pull_output_with_state(&mut gpiob.crl, PinState::High);
        wgate.set_speed(&mut gpiob.crl, IOPinSpeed::Mhz2);
        let mut head = gpiob
            .pb5
            .into_push_pull_output_with_state(&mut gpiob.crl, PinState::High);
        head.set_speed(&mut gpiob.crl, IOPinSpeed::Mhz2);

        // Flippy override sits low until a probe runs.
        let mut flippy_override = gpiob
            .pb14
            .into_push_pull_output_with_state(&mut gpiob.crh, PinState::Low);
        flippy_override.set_speed(&mut gpiob.crh, IOPinSpeed::Mhz2);

        Self {
            msel: PinMap::new([
                (10, msel10.erase()),
                (12, msel12.erase()),
                (14, msel14.erase()),
                (16, msel16.erase()),
            ]),
            user: PinMap::new([(2, user2.erase()), (4, user4.erase()), (6, user6.erase())]),
            flippy_override: flippy_override.erase(),
            trk0: pb4.erase(),
            wrprot: pb3.erase(),
            sense: gpiob.pb15.into_floating_input(&mut gpiob.crh).erase(),
            index: gpiob.pb10.into_floating_input(&mut gpiob.crh),
            heads: HeadControl {
                dir: BusPin::new(dir.erase()),
                step: BusPin::new(step.erase()),
                wgate: BusPin::new(wgate.erase()),
                head: BusPin::new(head.erase()),
            },
            rdata: pa15,
            wdata: gpioa.pa2.into_alternate_push_pull(&mut gpioa.crl),
            usart: UsartPins {
                tx: gpioa.pa9.into_alternate_push_pull(&mut gpioa.crh),
                rx: gpioa.pa10,
            },
        }
    }
}
