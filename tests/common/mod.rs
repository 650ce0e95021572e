//! A simulated HC-SR04 wired to a simulated tick counter.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};
use hcsr04_dwt::TickSource;
use hcsr04_dwt::native::PinBank;

/// Advances one tick per counter read and per echo sample.
pub struct SimClock {
    now: Cell<u32>,
    hz: Cell<u32>,
}

impl SimClock {
    pub fn new(hz: u32) -> Self {
        Self::starting_at(0, hz)
    }

    pub fn starting_at(start: u32, hz: u32) -> Self {
        Self {
            now: Cell::new(start),
            hz: Cell::new(hz),
        }
    }

    pub fn now(&self) -> u32 {
        self.now.get()
    }

    pub fn set_frequency(&self, hz: u32) {
        self.hz.set(hz);
    }

    fn advance(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(1));
        now
    }
}

impl TickSource for SimClock {
    fn ticks(&self) -> u32 {
        self.advance()
    }

    fn frequency_hz(&self) -> u32 {
        self.hz.get()
    }
}

/// Echo behaviour, in microseconds after the trigger's falling edge.
#[derive(Clone, Copy)]
pub enum Target {
    /// Echo rises after `delay_us` and stays high for `width_us`.
    At { delay_us: u32, width_us: u32 },
    /// Echo never rises.
    Absent,
}

pub struct SimSensor<'c> {
    clock: &'c SimClock,
    target: Target,
    trigger: Cell<PinState>,
    raised_at: Cell<Option<u32>>,
    fired_at: Cell<Option<u32>>,
    /// (tick, level) for every trigger write.
    pub trigger_log: RefCell<Vec<(u32, PinState)>>,
}

impl<'c> SimSensor<'c> {
    pub fn new(clock: &'c SimClock, target: Target) -> Self {
        Self {
            clock,
            target,
            trigger: Cell::new(PinState::Low),
            raised_at: Cell::new(None),
            fired_at: Cell::new(None),
            trigger_log: RefCell::new(Vec::new()),
        }
    }

    pub fn trigger_pin(&self) -> SimTrigger<'_, 'c> {
        SimTrigger(self)
    }

    pub fn echo_pin(&self) -> SimEcho<'_, 'c> {
        SimEcho(self)
    }

    /// Longest time the trigger was held high, in ticks.
    pub fn trigger_high_ticks(&self) -> u32 {
        self.trigger_log
            .borrow()
            .windows(2)
            .filter(|w| w[0].1 == PinState::High && w[1].1 == PinState::Low)
            .map(|w| w[1].0.wrapping_sub(w[0].0))
            .max()
            .unwrap_or(0)
    }

    fn set_trigger(&self, state: PinState) {
        let now = self.clock.now();
        self.trigger_log.borrow_mut().push((now, state));
        match (self.trigger.get(), state) {
            (PinState::Low, PinState::High) => self.raised_at.set(Some(now)),
            (PinState::High, PinState::Low) => {
                let long_enough = self.raised_at.get().is_some_and(|at| {
                    now.wrapping_sub(at) >= 10 * self.ticks_per_us()
                });
                if long_enough {
                    self.fired_at.set(Some(now));
                }
            }
            _ => {}
        }
        self.trigger.set(state);
    }

    fn echo_high(&self) -> bool {
        let now = self.clock.advance();
        let (Some(fired), Target::At { delay_us, width_us }) = (self.fired_at.get(), self.target)
        else {
            return false;
        };
        let since = now.wrapping_sub(fired);
        let rise = delay_us * self.ticks_per_us();
        since >= rise && since < rise + width_us * self.ticks_per_us()
    }

    fn ticks_per_us(&self) -> u32 {
        self.clock.ticks_per_micro()
    }
}

pub struct SimTrigger<'s, 'c>(&'s SimSensor<'c>);

impl ErrorType for SimTrigger<'_, '_> {
    type Error = Infallible;
}

impl OutputPin for SimTrigger<'_, '_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_trigger(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_trigger(PinState::High);
        Ok(())
    }
}

pub struct SimEcho<'s, 'c>(&'s SimSensor<'c>);

impl ErrorType for SimEcho<'_, '_> {
    type Error = Infallible;
}

impl InputPin for SimEcho<'_, '_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.echo_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.echo_high())
    }
}

/// The simulated sensor behind a pin-number interface.
pub struct SimBank<'s, 'c> {
    pub sensor: &'s SimSensor<'c>,
    pub trigger: i32,
    pub echo: i32,
    pub stray_accesses: u32,
}

impl PinBank for SimBank<'_, '_> {
    fn write(&mut self, pin: i32, state: PinState) {
        if pin == self.trigger {
            self.sensor.set_trigger(state);
        } else {
            self.stray_accesses += 1;
        }
    }

    fn read(&mut self, pin: i32) -> bool {
        if pin == self.echo {
            self.sensor.echo_high()
        } else {
            self.stray_accesses += 1;
            false
        }
    }
}
