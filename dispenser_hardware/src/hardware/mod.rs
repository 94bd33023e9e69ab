//! `rppal`-backed peripherals for a Raspberry Pi.

mod gpio;
mod hcsr04;
mod strip;

pub use gpio::{Buzzer, GpioSwitches, RelayPump};
pub use hcsr04::HcSr04;
pub use strip::{StripFeedback, Ws2812Spi};

use rppal::gpio::Gpio;

use crate::error::{HwError, Result};

pub(crate) fn open_gpio() -> Result<Gpio> {
    Gpio::new().map_err(|e| HwError::Gpio(format!("open gpio: {e}")))
}

pub(crate) fn claim(gpio: &Gpio, pin: u8) -> Result<rppal::gpio::Pin> {
    gpio.get(pin)
        .map_err(|e| HwError::Gpio(format!("claim pin {pin}: {e}")))
}
