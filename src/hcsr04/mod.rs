mod dwt_delay;
#[allow(clippy::module_inception)]
mod hcsr04;
mod pulse;
mod ticks;

pub use dwt_delay::{BusyDelay, sleep_micros};
pub use hcsr04::{ECHO_TIMEOUT_US, Echo, Error, HcSr04, TRIGGER_PULSE_US};
pub use pulse::{Pulse, measure_pulse, measure_pulse_width};
#[cfg(feature = "dwt")]
pub use ticks::DwtTicks;
pub use ticks::{DEFAULT_SYSTEM_FREQUENCY_HZ, TickSource, set_system_frequency, system_frequency};
