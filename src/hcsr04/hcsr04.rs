use core::hint::spin_loop;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};

use super::dwt_delay::sleep_micros;
use super::pulse::{Pulse, measure_pulse};
use super::ticks::TickSource;

/// Width of the trigger pulse that starts a ping.
pub const TRIGGER_PULSE_US: u32 = 10;

/// Longest echo the sensor produces (round trip at maximum range).
pub const ECHO_TIMEOUT_US: u32 = 35_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<T, E> {
    Trigger(T),
    Echo(E),
}

/// Result of a read with a bounded wait for the echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Echo {
    /// Echo pulse width in microseconds.
    Measured(u32),
    /// Echo still high after [`ECHO_TIMEOUT_US`]; nothing in range.
    TimedOut(u32),
    /// Echo never went high.
    NoResponse,
}

impl Echo {
    pub fn micros(self) -> Option<u32> {
        match self {
            Echo::Measured(us) | Echo::TimedOut(us) => Some(us),
            Echo::NoResponse => None,
        }
    }
}

pub struct HcSr04<Trig, EchoPin, T> {
    trigger: Trig,
    echo: EchoPin,
    ticks: T,
}

type ReadError<Trig, EchoPin> = Error<<Trig as ErrorType>::Error, <EchoPin as ErrorType>::Error>;

impl<Trig, EchoPin, T> HcSr04<Trig, EchoPin, T>
where
    Trig: OutputPin,
    EchoPin: InputPin,
    T: TickSource,
{
    /// Create a new HC-SR04 driver
    ///
    /// # Arguments
    /// * `trigger` - output connected to TRIG
    /// * `echo` - input connected to ECHO
    /// * `ticks` - counter used for the trigger pulse and the echo measurement
    pub fn new(trigger: Trig, echo: EchoPin, ticks: T) -> Self {
        Self {
            trigger,
            echo,
            ticks,
        }
    }

    /// Ping once and return the echo width in microseconds.
    ///
    /// Runs with preemption suppressed. The wait for the echo to start has no
    /// deadline: with the sensor unplugged this never returns. An echo that
    /// outlasts [`ECHO_TIMEOUT_US`] reads as about `ECHO_TIMEOUT_US`.
    pub fn read_pulse(&mut self) -> Result<u32, ReadError<Trig, EchoPin>> {
        let micros = critical_section::with(|_| {
            self.ping()?;

            while !self.echo_is_high()? {
                spin_loop();
            }

            self.measure(PinState::High, ECHO_TIMEOUT_US).map(Pulse::micros)
        })?;

        debug!("echo pulse: {} us", micros);
        Ok(micros)
    }

    /// Ping once, waiting at most `max_wait_us` for the echo to start.
    ///
    /// Unlike [`read_pulse`](Self::read_pulse) this always returns, and it
    /// reports a missing echo and an out-of-range echo separately.
    pub fn read_pulse_within(&mut self, max_wait_us: u32) -> Result<Echo, ReadError<Trig, EchoPin>> {
        let echo = critical_section::with(|_| {
            self.ping()?;

            if let Pulse::TimedOut(_) = self.measure(PinState::Low, max_wait_us)? {
                return Ok(Echo::NoResponse);
            }

            self.measure(PinState::High, ECHO_TIMEOUT_US).map(|pulse| match pulse {
                Pulse::Ended(us) => Echo::Measured(us),
                Pulse::TimedOut(us) => Echo::TimedOut(us),
            })
        })?;

        match echo {
            Echo::Measured(us) => debug!("echo pulse: {} us", us),
            Echo::TimedOut(us) => trace!("echo still high after {} us", us),
            Echo::NoResponse => warn!("no echo within {} us", max_wait_us),
        }
        Ok(echo)
    }

    /// Give back the pins and the tick source.
    pub fn release(self) -> (Trig, EchoPin, T) {
        (self.trigger, self.echo, self.ticks)
    }

    // Low, high for TRIGGER_PULSE_US, low.
    fn ping(&mut self) -> Result<(), ReadError<Trig, EchoPin>> {
        self.set_trigger(PinState::Low)?;
        self.set_trigger(PinState::High)?;
        sleep_micros(&self.ticks, TRIGGER_PULSE_US);
        self.set_trigger(PinState::Low)
    }

    fn set_trigger(&mut self, state: PinState) -> Result<(), ReadError<Trig, EchoPin>> {
        self.trigger.set_state(state).map_err(Error::Trigger)
    }

    fn echo_is_high(&mut self) -> Result<bool, ReadError<Trig, EchoPin>> {
        self.echo.is_high().map_err(Error::Echo)
    }

    fn measure(&mut self, level: PinState, timeout_us: u32) -> Result<Pulse, ReadError<Trig, EchoPin>> {
        measure_pulse(&self.ticks, &mut self.echo, level, timeout_us).map_err(Error::Echo)
    }
}
