//! Software-timed driver for HC-SR04 class ultrasonic sensors.
//!
//! The trigger pulse and the echo measurement are both busy-waited on a tick
//! counter (the DWT cycle counter on Cortex-M), so no timer or input-capture
//! peripheral is needed. Readings are raw echo widths in microseconds; turning
//! them into a distance is left to the caller (roughly `us / 58` for cm).
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod hcsr04;
pub mod native;

pub use hcsr04::{
    BusyDelay, DEFAULT_SYSTEM_FREQUENCY_HZ, ECHO_TIMEOUT_US, Echo, Error, HcSr04, Pulse,
    TRIGGER_PULSE_US, TickSource, measure_pulse, measure_pulse_width, set_system_frequency,
    sleep_micros, system_frequency,
};
#[cfg(feature = "dwt")]
pub use hcsr04::DwtTicks;
