#![no_std]
#![no_main]

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::time::Hertz;
use embassy_stm32::Config;
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use hcsr04_dwt::{DwtTicks, Echo, Error, HcSr04, set_system_frequency};

const SYSCLK_HZ: u32 = 168_000_000;

// Give up on a missing sensor after 100 ms instead of hanging.
const ECHO_WAIT_US: u32 = 100_000;

#[embassy_executor::main]
async fn main(_spawner: Spawner) -> ! {
    let mut config = Config::default();
    {
        use embassy_stm32::rcc::*;
        config.rcc.hse = Some(Hse {
            freq: Hertz(8_000_000),
            mode: HseMode::Oscillator,
        });
        config.rcc.pll_src = PllSource::HSE;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL168,
            divp: Some(PllPDiv::DIV2), // 8mhz / 4 * 168 / 2 = 168Mhz.
            divq: Some(PllQDiv::DIV7), // 8mhz / 4 * 168 / 7 = 48Mhz.
            divr: Some(PllRDiv::DIV2), // 8mhz / 4 * 168 / 2 = 168Mhz.
        });
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV4;
        config.rcc.apb2_pre = APBPrescaler::DIV2;
        config.rcc.sys = Sysclk::PLL1_P;
        config.rcc.mux.clk48sel = mux::Clk48sel::PLL1_Q;
    }
    let p = embassy_stm32::init(config);
    set_system_frequency(SYSCLK_HZ);

    let Some(mut core) = cortex_m::Peripherals::take() else {
        defmt::panic!("core peripherals already taken");
    };
    let ticks = DwtTicks::enable(&mut core.DCB, &mut core.DWT);

    let mut led = Output::new(p.PB13, Level::High, Speed::VeryHigh);

    // TRIG on PA8, ECHO on PA9
    let trigger = Output::new(p.PA8, Level::Low, Speed::VeryHigh);
    let echo = Input::new(p.PA9, Pull::Down);
    let mut sensor = HcSr04::new(trigger, echo, ticks);

    info!("HC-SR04 initialized on PA8/PA9, {} MHz", SYSCLK_HZ / 1_000_000);

    loop {
        led.toggle();

        match sensor.read_pulse_within(ECHO_WAIT_US) {
            Ok(Echo::Measured(us)) => {
                info!("Echo: {} us, {} cm, {} in", us, us / 58, us / 148);
            }
            Ok(Echo::TimedOut(us)) => {
                info!("Nothing in range ({} us)", us);
            }
            Ok(Echo::NoResponse) => {
                warn!("HC-SR04 did not respond, check wiring");
            }
            Err(Error::Trigger(e)) | Err(Error::Echo(e)) => match e {},
        }

        // HC-SR04 datasheet asks for at least 60ms between pings
        Timer::after_millis(100).await;
    }
}
