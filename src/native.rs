//! Entry point for hosts that address pins by number.
//!
//! A scripting host hands over its call arguments as [`Value`]s and gets one
//! back. Pins are reached through a [`PinBank`], which the host has already
//! set up (trigger as output, echo as input).

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};

use crate::hcsr04::{Error, HcSr04, TickSource};

/// A host value crossing the call boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Int(i32),
    Float(f32),
    Str(&'a str),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CallError {
    /// Arguments were not exactly two integers.
    Type,
    /// The reading does not fit the host integer type.
    Overflow,
}

/// Digital I/O addressed by pin number.
pub trait PinBank {
    fn write(&mut self, pin: i32, state: PinState);
    fn read(&mut self, pin: i32) -> bool;
}

struct BankPin<'r, 'b, B> {
    bank: &'r RefCell<&'b mut B>,
    pin: i32,
}

impl<B> ErrorType for BankPin<'_, '_, B> {
    type Error = Infallible;
}

impl<B: PinBank> OutputPin for BankPin<'_, '_, B> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.bank.borrow_mut().write(self.pin, PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.bank.borrow_mut().write(self.pin, PinState::High);
        Ok(())
    }
}

impl<B: PinBank> InputPin for BankPin<'_, '_, B> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.bank.borrow_mut().read(self.pin))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.bank.borrow_mut().read(self.pin))
    }
}

/// `(trigger, echo) -> microseconds`
///
/// Rejects anything but two integer arguments before touching a pin, then
/// performs one [`HcSr04::read_pulse`]. Like that call, this blocks for as
/// long as the echo pin stays low.
pub fn read_distance_raw<B, T>(
    args: &[Value<'_>],
    bank: &mut B,
    ticks: T,
) -> Result<Value<'static>, CallError>
where
    B: PinBank,
    T: TickSource,
{
    let &[Value::Int(trigger), Value::Int(echo)] = args else {
        debug!("read_distance_raw: rejected {} arguments", args.len());
        return Err(CallError::Type);
    };

    let bank = RefCell::new(bank);
    let mut sensor = HcSr04::new(
        BankPin { bank: &bank, pin: trigger },
        BankPin { bank: &bank, pin: echo },
        ticks,
    );

    let micros = match sensor.read_pulse() {
        Ok(us) => us,
        Err(Error::Trigger(never)) | Err(Error::Echo(never)) => match never {},
    };

    i32::try_from(micros)
        .map(Value::Int)
        .map_err(|_| CallError::Overflow)
}
