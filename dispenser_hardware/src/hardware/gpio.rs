use std::time::Duration;

use dispenser_traits::{BoxError, Pump, SwitchState, Switches};
use rppal::gpio::{InputPin, OutputPin};

use crate::error::{HwError, Result};

/// Two momentary switches on plain GPIO inputs.
pub struct GpioSwitches {
    switch_1: InputPin,
    switch_2: InputPin,
    active_low: bool,
}

impl GpioSwitches {
    /// Active-low wiring gets internal pull-ups, active-high gets pull-downs.
    pub fn new(switch_1: u8, switch_2: u8, active_low: bool) -> Result<Self> {
        let gpio = super::open_gpio()?;
        let input = |pin| -> Result<InputPin> {
            let p = super::claim(&gpio, pin)?;
            Ok(if active_low {
                p.into_input_pullup()
            } else {
                p.into_input_pulldown()
            })
        };
        Ok(Self {
            switch_1: input(switch_1)?,
            switch_2: input(switch_2)?,
            active_low,
        })
    }

    fn pressed(&self, pin: &InputPin) -> bool {
        pin.is_high() != self.active_low
    }
}

impl Switches for GpioSwitches {
    fn poll(&mut self) -> std::result::Result<SwitchState, BoxError> {
        let mut bits = 0;
        if self.pressed(&self.switch_1) {
            bits |= SwitchState::SWITCH_1;
        }
        if self.pressed(&self.switch_2) {
            bits |= SwitchState::SWITCH_2;
        }
        Ok(SwitchState::from_bits(bits))
    }
}

/// Relay (or MOSFET) driving the pump. Closed as soon as it is constructed.
pub struct RelayPump {
    pin: OutputPin,
    active_low: bool,
}

impl RelayPump {
    pub fn new(pin: u8, active_low: bool) -> Result<Self> {
        let gpio = super::open_gpio()?;
        let p = super::claim(&gpio, pin)?;
        let pin = if active_low {
            p.into_output_high()
        } else {
            p.into_output_low()
        };
        tracing::debug!(active_low, "relay initialised closed");
        Ok(Self { pin, active_low })
    }
}

impl Pump for RelayPump {
    fn set_flow(&mut self, open: bool) -> std::result::Result<(), BoxError> {
        if open != self.active_low {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
        Ok(())
    }
}

/// Passive buzzer on a software-PWM pin.
pub struct Buzzer {
    pin: OutputPin,
}

impl Buzzer {
    const TONE_HZ: f64 = 2_000.0;
    const BEEP: Duration = Duration::from_millis(100);
    const GAP: Duration = Duration::from_millis(100);
    const BEEPS: u32 = 3;

    pub fn new(pin: u8) -> Result<Self> {
        let gpio = super::open_gpio()?;
        Ok(Self {
            pin: super::claim(&gpio, pin)?.into_output_low(),
        })
    }

    /// Three short beeps; blocks for ~500 ms.
    pub fn beep_pattern(&mut self) -> Result<()> {
        for i in 0..Self::BEEPS {
            self.pin
                .set_pwm_frequency(Self::TONE_HZ, 0.5)
                .map_err(|e| HwError::Gpio(format!("buzzer pwm: {e}")))?;
            std::thread::sleep(Self::BEEP);
            self.pin
                .clear_pwm()
                .map_err(|e| HwError::Gpio(format!("buzzer pwm: {e}")))?;
            self.pin.set_low();
            if i + 1 < Self::BEEPS {
                std::thread::sleep(Self::GAP);
            }
        }
        Ok(())
    }
}
