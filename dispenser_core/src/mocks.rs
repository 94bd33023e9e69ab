//! Test and helper adapters for dispenser_core.

use dispenser_traits::{BoxError, Color, Distance, Feedback, Pump, RangeSensor, SwitchState, Switches};

/// Switches that are never pressed; for runs without an operator panel.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSwitches;

impl Switches for NoSwitches {
    fn poll(&mut self) -> Result<SwitchState, BoxError> {
        Ok(SwitchState::default())
    }
}

/// A sensor whose every read fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSensor;

impl RangeSensor for FailingSensor {
    fn read_distance(&mut self) -> Result<Distance, BoxError> {
        Err(Box::new(std::io::Error::other("sensor unplugged")))
    }
}

/// Pump that rejects opening, closing, or both.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingPump {
    pub fail_open: bool,
    pub fail_close: bool,
}

impl Pump for FailingPump {
    fn set_flow(&mut self, open: bool) -> Result<(), BoxError> {
        if (open && self.fail_open) || (!open && self.fail_close) {
            return Err(Box::new(std::io::Error::other(if open {
                "relay stuck open-circuit"
            } else {
                "relay stuck closed-circuit"
            })));
        }
        Ok(())
    }
}

/// Feedback whose every call fails; the controller must not care.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrokenFeedback;

impl Feedback for BrokenFeedback {
    fn show_all(&mut self, _color: Color) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("strip not responding")))
    }
    fn set_brightness(&mut self, _pct: u8) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("strip not responding")))
    }
    fn alert(&mut self) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("buzzer not responding")))
    }
}
