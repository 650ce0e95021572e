use core::sync::atomic::{AtomicU32, Ordering};

/// HSI clock an STM32F4 runs on out of reset.
pub const DEFAULT_SYSTEM_FREQUENCY_HZ: u32 = 16_000_000;

static SYSTEM_FREQUENCY_HZ: AtomicU32 = AtomicU32::new(DEFAULT_SYSTEM_FREQUENCY_HZ);

/// Publish the core clock frequency. Call again after every clock tree change.
pub fn set_system_frequency(hz: u32) {
    SYSTEM_FREQUENCY_HZ.store(hz, Ordering::Relaxed);
}

/// Core clock frequency last published with [`set_system_frequency`].
pub fn system_frequency() -> u32 {
    SYSTEM_FREQUENCY_HZ.load(Ordering::Relaxed)
}

/// A free-running counter and the rate it counts at.
pub trait TickSource {
    /// Current counter value. Wraps at `u32::MAX`.
    fn ticks(&self) -> u32;

    /// Counting rate in Hz.
    fn frequency_hz(&self) -> u32;

    /// Ticks per microsecond, derived from the rate at the time of the call.
    ///
    /// Never zero, so clocks below 1 MHz count one tick per microsecond.
    fn ticks_per_micro(&self) -> u32 {
        (self.frequency_hz() / 1_000_000).max(1)
    }
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn ticks(&self) -> u32 {
        (**self).ticks()
    }

    fn frequency_hz(&self) -> u32 {
        (**self).frequency_hz()
    }
}

#[cfg(feature = "dwt")]
mod dwt {
    use cortex_m::peripheral::{DCB, DWT};

    use super::TickSource;

    /// DWT cycle counter, counting at the published system frequency.
    #[derive(Debug, Clone, Copy)]
    pub struct DwtTicks {
        _enabled: (),
    }

    impl DwtTicks {
        /// Turn on tracing and the cycle counter.
        pub fn enable(dcb: &mut DCB, dwt: &mut DWT) -> Self {
            dcb.enable_trace();
            dwt.enable_cycle_counter();
            Self { _enabled: () }
        }
    }

    impl TickSource for DwtTicks {
        #[inline(always)]
        fn ticks(&self) -> u32 {
            DWT::cycle_count()
        }

        fn frequency_hz(&self) -> u32 {
            super::system_frequency()
        }
    }
}

#[cfg(feature = "dwt")]
pub use dwt::DwtTicks;
