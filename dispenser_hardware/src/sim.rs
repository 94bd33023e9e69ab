//! Simulated peripherals for development hosts and tests.
//!
//! State that a test or the CLI needs to inspect (pump flow, pending switch
//! presses) lives behind `Arc` atomics so it stays reachable after the
//! adapter has been moved into the controller or the poller thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use dispenser_traits::{BoxError, Color, Distance, Feedback, Pump, RangeSensor, SwitchState, Switches};

/// Replays a fixed sequence of distances, then repeats the last one.
/// An empty sequence yields `Distance::NO_ECHO`.
#[derive(Debug, Clone)]
pub struct SimulatedRangeSensor {
    seq: Vec<Distance>,
    idx: usize,
}

impl SimulatedRangeSensor {
    pub fn new(seq: impl IntoIterator<Item = Distance>) -> Self {
        Self {
            seq: seq.into_iter().collect(),
            idx: 0,
        }
    }

    pub fn from_cm(seq: &[u16]) -> Self {
        Self::new(seq.iter().copied().map(Distance::from_cm))
    }

    /// Always reports the same distance.
    pub fn constant(cm: u16) -> Self {
        Self::from_cm(&[cm])
    }
}

impl RangeSensor for SimulatedRangeSensor {
    fn read_distance(&mut self) -> Result<Distance, BoxError> {
        let d = match self.seq.get(self.idx) {
            Some(d) => {
                self.idx += 1;
                *d
            }
            None => self.seq.last().copied().unwrap_or(Distance::NO_ECHO),
        };
        tracing::debug!(distance = %d, "range read (simulated)");
        Ok(d)
    }
}

/// Cloneable handle used to "press" simulated switches from another thread.
#[derive(Debug, Clone, Default)]
pub struct SwitchPresser {
    pending: Arc<AtomicU8>,
}

impl SwitchPresser {
    /// Latch a press; it is reported by the next `poll()` and then cleared.
    pub fn press(&self, bits: u8) {
        self.pending.fetch_or(bits, Ordering::AcqRel);
    }

    pub fn press_force(&self) {
        self.press(SwitchState::SWITCH_1);
    }

    pub fn press_reset(&self) {
        self.press(SwitchState::SWITCH_2);
    }
}

/// Momentary switches: each latched press is visible to exactly one poll.
#[derive(Debug, Default)]
pub struct SimulatedSwitches {
    pending: Arc<AtomicU8>,
}

impl SimulatedSwitches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presser(&self) -> SwitchPresser {
        SwitchPresser {
            pending: self.pending.clone(),
        }
    }
}

impl Switches for SimulatedSwitches {
    fn poll(&mut self) -> Result<SwitchState, BoxError> {
        Ok(SwitchState::from_bits(self.pending.swap(0, Ordering::AcqRel)))
    }
}

/// Pump that only records whether the fluid path is open. Starts closed.
#[derive(Debug, Default)]
pub struct SimulatedPump {
    open: Arc<AtomicBool>,
}

impl SimulatedPump {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the flow flag.
    pub fn flow_flag(&self) -> Arc<AtomicBool> {
        self.open.clone()
    }
}

impl Pump for SimulatedPump {
    fn set_flow(&mut self, open: bool) -> Result<(), BoxError> {
        self.open.store(open, Ordering::Release);
        tracing::info!(open, "pump {} (simulated)", if open { "on" } else { "off" });
        Ok(())
    }
}

/// Strip + buzzer stand-in that logs what it would display.
#[derive(Debug)]
pub struct SimulatedFeedback {
    color: Color,
    brightness_pct: u8,
    alerts: Arc<AtomicU32>,
}

impl Default for SimulatedFeedback {
    fn default() -> Self {
        Self {
            color: Color::Off,
            brightness_pct: 100,
            alerts: Arc::new(AtomicU32::new(0)),
        }
    }
}

impl SimulatedFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn brightness(&self) -> u8 {
        self.brightness_pct
    }

    /// Shared count of alerts played so far.
    pub fn alert_counter(&self) -> Arc<AtomicU32> {
        self.alerts.clone()
    }
}

impl Feedback for SimulatedFeedback {
    fn show_all(&mut self, color: Color) -> Result<(), BoxError> {
        self.color = color;
        tracing::debug!(?color, brightness = self.brightness_pct, "strip (simulated)");
        Ok(())
    }

    fn set_brightness(&mut self, pct: u8) -> Result<(), BoxError> {
        self.brightness_pct = pct.min(100);
        Ok(())
    }

    fn alert(&mut self) -> Result<(), BoxError> {
        self.alerts.fetch_add(1, Ordering::AcqRel);
        tracing::info!("alert (simulated buzzer)");
        Ok(())
    }
}
