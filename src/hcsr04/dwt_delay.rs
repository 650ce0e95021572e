use core::hint::spin_loop;

use embedded_hal::delay::DelayNs;

use super::ticks::TickSource;

/// Spin until at least `micros` microseconds worth of ticks have passed.
///
/// The tick rate is read once per call, so a new clock frequency applies from
/// the next call on.
pub fn sleep_micros<T: TickSource + ?Sized>(ticks: &T, micros: u32) {
    let start = ticks.ticks();
    let budget = ticks.ticks_per_micro().saturating_mul(micros);

    loop {
        let elapsed = ticks.ticks().wrapping_sub(start);
        if elapsed >= budget {
            break;
        }
        spin_loop();
    }
}

/// Busy-wait delay provider that works with any tick source and CPU frequency
pub struct BusyDelay<T> {
    ticks: T,
}

impl<T: TickSource> BusyDelay<T> {
    pub fn new(ticks: T) -> Self {
        Self { ticks }
    }

    #[inline(always)]
    pub fn sleep_micros(&self, micros: u32) {
        sleep_micros(&self.ticks, micros);
    }

    pub fn into_inner(self) -> T {
        self.ticks
    }
}

impl<T: TickSource> DelayNs for BusyDelay<T> {
    fn delay_ns(&mut self, ns: u32) {
        self.sleep_micros(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.sleep_micros(us);
    }
}
