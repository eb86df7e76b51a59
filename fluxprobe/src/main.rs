#![no_main]
#![no_std]
#![allow(dead_code)]

use cortex_m::asm;
use cortex_m_rt::entry;
use panic_halt as _;

use core::fmt::Write;
use core::sync::atomic::{AtomicU32, Ordering};

use stm32f1xx_hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
};

mod hw;

use floppy::{Bus, FloppyController};
use hw::{BoardPins, Console, FluxEngine, FLUX_BUF};

static INDEX_PULSES: AtomicU32 = AtomicU32::new(0);

fn count_index_pulse() {
    INDEX_PULSES.fetch_add(1, Ordering::Relaxed);
}

#[entry]
fn main() -> ! {
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = pac::Peripherals::take().unwrap();

    // The flux engine programs TIM2 and DMA1 at the register level, so
    // their clocks are switched on here rather than through HAL wrappers.
    dp.RCC.apb1enr.modify(|_, w| w.tim2en().set_bit());
    dp.RCC.ahbenr.modify(|_, w| w.dma1en().set_bit());

    // Clocks
    let mut flash = dp.FLASH.constrain();
    let rcc = dp.RCC.constrain();
    let clocks = rcc
        .cfgr
        .use_hse(8.MHz())
        .sysclk(72.MHz())
        .pclk1(36.MHz())
        .freeze(&mut flash.acr);

    let mut afio = dp.AFIO.constrain();
    let mut exti = dp.EXTI;

    // GPIO: remaps, bus pin configuration, lookup tables
    let mut pins = BoardPins::new(dp.GPIOA, dp.GPIOB, &mut afio.mapr);

    // Index pulses fire EXTI15_10 (vector 40); the handler only runs the
    // installed hook.
    hw::index::on_index_pulse(count_index_pulse);
    hw::index::arm(&mut pins.index, &mut afio, &mut exti);

    let mut engine = FluxEngine::new(dp.TIM2, dp.DMA1);

    let delay = cp.SYST.delay(&clocks);
    let mut ctrl = FloppyController::new(
        pins.msel,
        pins.user,
        pins.flippy_override,
        pins.trk0,
        pins.sense,
        delay,
    );

    // USART1 (DBG)
    let serial = Serial::new(
        dp.USART1,
        (pins.usart.tx, pins.usart.rx),
        &mut afio.mapr,
        Config::default().baudrate(115_200.bps()),
        &clocks,
    );
    let mut console = Console::new(serial);

    console.println("fluxprobe: floppy interface up");

    // BRING-UP CHECKS (the host protocol drives these once attached)
    ctrl.reset_user_pins();
    ctrl.set_bus(Some(Bus::IbmPc));
    let _ = writeln!(console, "flippy media: {}\r", ctrl.flippy_detect());

    engine.rdata_prep(&FLUX_BUF);

    loop {
        asm::delay(72_000_000);
        let _ = writeln!(
            console,
            "index={} capture_pos={}\r",
            INDEX_PULSES.load(Ordering::Relaxed),
            engine.capture_pos()
        );
    }
}
