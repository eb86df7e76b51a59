//! SAMPLE-rate timing math and flux ring-buffer arithmetic.
//!
//! The flux timer counts at SAMPLE rate, so one counter LSB is one flux
//! time unit. Both the capture and the emit engine use the same rate; the
//! codec above this layer never has to convert between the two directions.

/// System clock of the probe, MHz.
pub const SYSCLK_MHZ: u32 = 72;

/// Flux sampling clock, MHz. One timer LSB = 1/72 µs.
pub const SAMPLE_MHZ: u32 = 72;

/// Timer prescale factor to get from SYSCLK to SAMPLE rate.
pub const TIM_PSC: u16 = (SYSCLK_MHZ / SAMPLE_MHZ) as u16;

/// Number of 16-bit samples in the flux ring buffer (16 KiB).
pub const FLUX_BUF_LEN: usize = 8192;

/// Convert nanoseconds into SAMPLE-rate counts, rounding to nearest.
pub const fn sample_ns(ns: u32) -> u16 {
    ((ns * SAMPLE_MHZ + 500) / 1000) as u16
}

/// Convert microseconds into SAMPLE-rate counts.
pub const fn sample_us(us: u32) -> u32 {
    us * SAMPLE_MHZ
}

/// Samples the consumer still has to read, given its own index and the DMA
/// engine's write position in a ring of `len` slots.
///
/// Both indices wrap at `len`. When the lag reaches `len` the DMA engine
/// has caught up with the consumer from behind and older samples have been
/// overwritten; that loss is detected here and nowhere else.
pub const fn ring_pending(consumer: usize, producer: usize, len: usize) -> usize {
    (producer + len - consumer) % len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_pulse_width() {
        // 400 ns at 72 MHz is 28.8 counts; nearest is 29.
        assert_eq!(sample_ns(400), 29);
    }

    #[test]
    fn sample_round_trip_points() {
        assert_eq!(sample_ns(0), 0);
        assert_eq!(sample_ns(1000), 72);
        assert_eq!(sample_us(1), 72);
        assert_eq!(sample_us(1000), 72_000);
    }

    #[test]
    fn prescaler_is_unity() {
        // SAMPLE rate == SYSCLK, so the prescaler register value is
        // TIM_PSC - 1 == 0.
        assert_eq!(TIM_PSC, 1);
    }

    #[test]
    fn ring_pending_wraps() {
        assert_eq!(ring_pending(0, 0, 8), 0);
        assert_eq!(ring_pending(2, 5, 8), 3);
        assert_eq!(ring_pending(6, 1, 8), 3);
        assert_eq!(ring_pending(7, 0, 8), 1);
    }
}
