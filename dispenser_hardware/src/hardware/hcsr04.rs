use std::time::{Duration, Instant};

use dispenser_traits::{BoxError, Distance, RangeSensor};
use rppal::gpio::{InputPin, OutputPin};
use tracing::trace;

use crate::error::Result;
use crate::util::{spin_for, wait_for_level};

const TRIGGER_PULSE: Duration = Duration::from_micros(10);

/// HC-SR04 ultrasonic ranger.
pub struct HcSr04 {
    echo: InputPin,
    trigger: OutputPin,
    echo_timeout: Duration,
}

impl HcSr04 {
    pub fn new(echo_pin: u8, trigger_pin: u8, echo_timeout: Duration) -> Result<Self> {
        let gpio = super::open_gpio()?;
        let echo = super::claim(&gpio, echo_pin)?.into_input_pulldown();
        let trigger = super::claim(&gpio, trigger_pin)?.into_output_low();
        Ok(Self {
            echo,
            trigger,
            echo_timeout,
        })
    }

    /// Fire one ping and time the echo pulse.
    pub fn measure(&mut self) -> Result<Distance> {
        self.trigger.set_high();
        spin_for(TRIGGER_PULSE);
        self.trigger.set_low();

        let echo = &self.echo;
        wait_for_level(|| echo.is_high(), true, self.echo_timeout, Duration::ZERO)?;
        let rise = Instant::now();
        wait_for_level(|| echo.is_high(), false, self.echo_timeout, Duration::ZERO)?;
        let width_us = u64::try_from(rise.elapsed().as_micros()).unwrap_or(u64::MAX);

        let d = Distance::from_echo_micros(width_us);
        trace!(width_us, distance = %d, "hc-sr04 echo");
        Ok(d)
    }
}

impl RangeSensor for HcSr04 {
    fn read_distance(&mut self) -> std::result::Result<Distance, BoxError> {
        self.measure().map_err(Into::into)
    }
}
