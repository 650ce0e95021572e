use core::hint::spin_loop;

use embedded_hal::digital::{InputPin, PinState};

use super::ticks::TickSource;

/// Outcome of a polled pulse measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pulse {
    /// The pin left the target level after this many microseconds.
    Ended(u32),
    /// The pin was still at the target level when the timeout ran out.
    TimedOut(u32),
}

impl Pulse {
    pub fn micros(self) -> u32 {
        match self {
            Pulse::Ended(us) | Pulse::TimedOut(us) => us,
        }
    }
}

/// Time how long `pin` stays at `level`, giving up after `timeout_us`.
///
/// Measurement starts on entry, so the pin is expected to already be at
/// `level`. A pin that is not returns `Pulse::Ended` with a near-zero width.
pub fn measure_pulse<P, T>(
    ticks: &T,
    pin: &mut P,
    level: PinState,
    timeout_us: u32,
) -> Result<Pulse, P::Error>
where
    P: InputPin,
    T: TickSource + ?Sized,
{
    let start = ticks.ticks();
    let ticks_per_us = ticks.ticks_per_micro();
    let budget = ticks_per_us.saturating_mul(timeout_us);
    let target_high = level == PinState::High;

    let timed_out = loop {
        if ticks.ticks().wrapping_sub(start) >= budget {
            break true;
        }
        if pin.is_high()? != target_high {
            break false;
        }
        spin_loop();
    };

    let micros = ticks.ticks().wrapping_sub(start) / ticks_per_us;
    Ok(if timed_out {
        Pulse::TimedOut(micros)
    } else {
        Pulse::Ended(micros)
    })
}

/// Raw pulse width in microseconds.
///
/// A timeout is not reported: a pulse that outlasts `timeout_us` reads as
/// (about) `timeout_us`. Use [`measure_pulse`] to tell the two apart.
pub fn measure_pulse_width<P, T>(
    ticks: &T,
    pin: &mut P,
    level: PinState,
    timeout_us: u32,
) -> Result<u32, P::Error>
where
    P: InputPin,
    T: TickSource + ?Sized,
{
    measure_pulse(ticks, pin, level, timeout_us).map(Pulse::micros)
}
