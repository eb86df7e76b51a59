//! Flux capture and emit engine on TIM2 + DMA1.
//!
//! Both directions run at SAMPLE rate off the same prescaler, so one
//! counter LSB is one flux time unit either way. Capture timestamps every
//! falling RDATA edge into the ring buffer by DMA; emit produces a fixed
//! 400 ns pulse per timer reload and fetches the next reload value from
//! the same buffer by DMA. Neither direction needs a per-sample interrupt.

use core::cell::UnsafeCell;

use floppy::flux::{sample_ns, FLUX_BUF_LEN, TIM_PSC};
use stm32f1xx_hal::pac::{DMA1, TIM2};

/// The 16 KiB flux ring buffer: 8192 16-bit slots, word aligned.
///
/// The buffer is owned by exactly one DMA direction at a time (tracked by
/// [`FluxEngine`]); the codec above this layer reads or stages samples
/// through the raw pointer while the opposite direction is idle.
#[repr(C, align(4))]
pub struct FluxBuf {
    samples: UnsafeCell<[u16; FLUX_BUF_LEN]>,
}

// One CPU, and the CPU only touches the half the DMA is not using.
unsafe impl Sync for FluxBuf {}

impl FluxBuf {
    const fn new() -> Self {
        Self {
            samples: UnsafeCell::new([0; FLUX_BUF_LEN]),
        }
    }

    fn addr(&self) -> u32 {
        self.samples.get() as u32
    }

    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        FLUX_BUF_LEN
    }

    pub fn as_mut_ptr(&self) -> *mut u16 {
        self.samples.get() as *mut u16
    }
}

pub static FLUX_BUF: FluxBuf = FluxBuf::new();

/// Which direction currently owns the timer and the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluxMode {
    Idle,
    Capture,
    Emit,
}

/// TIM2 and its two flux DMA channels as one unit: ch.1/DMA ch.5 for
/// capture, ch.3/DMA ch.2 for emit. Arming one direction disarms the
/// other, so DMA and timer are never enabled for both at once.
pub struct FluxEngine {
    tim: TIM2,
    dma: DMA1,
    mode: FluxMode,
}

impl FluxEngine {
    /// Take ownership of the (already clocked) timer and DMA controller.
    pub fn new(tim: TIM2, dma: DMA1) -> Self {
        Self {
            tim,
            dma,
            mode: FluxMode::Idle,
        }
    }

    pub fn mode(&self) -> FluxMode {
        self.mode
    }

    /// Arm capture: every falling RDATA edge latches the free-running
    /// counter into CCR1, and DMA copies each sample into the ring buffer.
    ///
    /// The counter wraps at 0xFFFF; long flux gaps show up as wrapped
    /// deltas which the decoder reconstructs. Overruns are not detected
    /// here, older samples are simply overwritten.
    pub fn rdata_prep(&mut self, buf: &'static FluxBuf) {
        self.disarm();

        // Counter runs 0x0000..=0xFFFF at SAMPLE rate.
        self.tim.psc.write(|w| w.psc().bits(TIM_PSC - 1));
        self.tim.arr.write(|w| w.arr().bits(0xffff));
        // Ch.1 captures TI1 on every edge event, no filter, no prescale.
        self.tim
            .ccmr1_input()
            .write(|w| unsafe { w.cc1s().bits(0b01) });
        self.tim.dier.write(|w| w.cc1de().set_bit());
        self.tim.cr2.reset();
        // Load PSC/ARR now, then drop the spurious update flag.
        self.tim.egr.write(|w| w.ug().set_bit());
        self.tim.sr.write(|w| unsafe { w.bits(0) });

        // CCR1 -> ring buffer, 16-bit, circular, high priority.
        let capture_reg = &self.tim.ccr1 as *const _ as u32;
        let ch = &self.dma.ch5;
        ch.par.write(|w| unsafe { w.bits(capture_reg) });
        ch.mar.write(|w| unsafe { w.bits(buf.addr()) });
        ch.ndtr.write(|w| unsafe { w.bits(buf.len() as u32) });
        ch.cr.write(|w| {
            w.pl()
                .high()
                .msize()
                .bits16()
                .psize()
                .bits16()
                .minc()
                .set_bit()
                .circ()
                .set_bit()
                .dir()
                .clear_bit()
                .en()
                .set_bit()
        });

        // DMA listens before the capture channel opens, so the first edge
        // is kept (at worst it is a stale pre-arm sample).
        self.tim.ccer.write(|w| w.cc1e().set_bit().cc1p().set_bit());
        self.tim.cr1.modify(|_, w| w.cen().set_bit());
        self.mode = FluxMode::Capture;
    }

    /// Configure emit without starting it: ch.3 in PWM mode 1 drives
    /// WDATA asserted for 400 ns after every reload, and each update event
    /// requests the next inter-pulse gap (ARR value) from DMA.
    ///
    /// The host stages the buffer between this call and
    /// [`dma_wdata_start`](Self::dma_wdata_start).
    pub fn wdata_prep(&mut self) {
        self.disarm();

        self.tim.psc.write(|w| w.psc().bits(TIM_PSC - 1));
        self.tim
            .ccmr2_output()
            .write(|w| unsafe { w.oc3m().bits(0b110).cc3s().bits(0b00) });
        // Output polarity inverted: asserted is electrically low.
        self.tim.ccer.write(|w| w.cc3e().set_bit().cc3p().set_bit());
        self.tim
            .ccr3
            .write(|w| unsafe { w.bits(sample_ns(400) as u32) });
        self.tim.dier.write(|w| w.ude().set_bit());
        self.tim.cr2.reset();
    }

    /// Point the emit DMA at `count` staged reload values and let the
    /// timer run. Timer enable follows DMA enable, mirroring the capture
    /// path.
    pub fn dma_wdata_start(&mut self, buf: &'static FluxBuf, count: usize) {
        debug_assert!(count <= buf.len());

        let reload_reg = &self.tim.arr as *const _ as u32;
        let ch = &self.dma.ch2;
        ch.par.write(|w| unsafe { w.bits(reload_reg) });
        ch.mar.write(|w| unsafe { w.bits(buf.addr()) });
        ch.ndtr.write(|w| unsafe { w.bits(count as u32) });
        ch.cr.write(|w| {
            w.pl()
                .high()
                .msize()
                .bits16()
                .psize()
                .bits16()
                .minc()
                .set_bit()
                .circ()
                .set_bit()
                .dir()
                .set_bit()
                .en()
                .set_bit()
        });

        self.tim.cr1.modify(|_, w| w.cen().set_bit());
        self.mode = FluxMode::Emit;
    }

    /// Stop whichever direction is running: DMA channels first, then the
    /// counter.
    pub fn disarm(&mut self) {
        self.dma.ch5.cr.modify(|_, w| w.en().clear_bit());
        self.dma.ch2.cr.modify(|_, w| w.en().clear_bit());
        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
        self.tim.ccer.reset();
        self.mode = FluxMode::Idle;
    }

    /// Capture DMA write position in the ring, in samples. The consumer
    /// subtracts its own index (wrap-aware) to detect lag.
    pub fn capture_pos(&self) -> usize {
        FLUX_BUF_LEN - self.dma.ch5.ndtr.read().bits() as usize
    }
}
