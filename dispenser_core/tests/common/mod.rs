#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dispenser_core::{DispenserCore, MemoryLogger, build_dispenser};
use dispenser_core::{FeedbackCfg, PresenceCfg, TimingCfg};
use dispenser_traits::clock::test_clock::TestClock;
use dispenser_traits::{BoxError, Color, Distance, Feedback, Pump, RangeSensor};

/// Scripted sensor; repeats the last entry. Counts reads.
pub struct ScriptSensor {
    script: Vec<Result<u16, &'static str>>,
    pub reads: Arc<Mutex<u32>>,
}

impl ScriptSensor {
    pub fn cm(seq: &[u16]) -> Self {
        Self {
            script: seq.iter().map(|v| Ok(*v)).collect(),
            reads: Arc::default(),
        }
    }

    pub fn with(script: Vec<Result<u16, &'static str>>) -> Self {
        Self {
            script,
            reads: Arc::default(),
        }
    }
}

impl RangeSensor for ScriptSensor {
    fn read_distance(&mut self) -> Result<Distance, BoxError> {
        let mut n = self.reads.lock().unwrap();
        let idx = (*n as usize).min(self.script.len().saturating_sub(1));
        *n += 1;
        match self.script.get(idx).copied().unwrap_or(Err("empty script")) {
            Ok(cm) => Ok(Distance::from_cm(cm)),
            Err(msg) => Err(msg.into()),
        }
    }
}

/// Records every `set_flow` call with the simulated time it happened.
pub struct SpyPump {
    clock: TestClock,
    pub calls: Arc<Mutex<Vec<(bool, Duration)>>>,
}

impl SpyPump {
    pub fn new(clock: TestClock) -> Self {
        Self {
            clock,
            calls: Arc::default(),
        }
    }
}

impl Pump for SpyPump {
    fn set_flow(&mut self, open: bool) -> Result<(), BoxError> {
        self.calls
            .lock()
            .unwrap()
            .push((open, self.clock.elapsed()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fx {
    Show(Color),
    Brightness(u8),
    Alert,
}

#[derive(Default)]
pub struct SpyFeedback {
    pub calls: Arc<Mutex<Vec<Fx>>>,
}

impl Feedback for SpyFeedback {
    fn show_all(&mut self, color: Color) -> Result<(), BoxError> {
        self.calls.lock().unwrap().push(Fx::Show(color));
        Ok(())
    }
    fn set_brightness(&mut self, pct: u8) -> Result<(), BoxError> {
        self.calls.lock().unwrap().push(Fx::Brightness(pct));
        Ok(())
    }
    fn alert(&mut self) -> Result<(), BoxError> {
        self.calls.lock().unwrap().push(Fx::Alert);
        Ok(())
    }
}

/// Controller wired to spies plus handles to inspect them.
pub struct Rig {
    pub d: DispenserCore<ScriptSensor, SpyPump, SpyFeedback>,
    pub clock: TestClock,
    pub reads: Arc<Mutex<u32>>,
    pub pump: Arc<Mutex<Vec<(bool, Duration)>>>,
    pub fx: Arc<Mutex<Vec<Fx>>>,
    pub log: MemoryLogger,
}

impl Rig {
    pub fn new(sensor: ScriptSensor, interval: u32) -> Self {
        let clock = TestClock::new();
        let pump = SpyPump::new(clock.clone());
        let feedback = SpyFeedback::default();
        let log = MemoryLogger::new();
        let reads = sensor.reads.clone();
        let pump_calls = pump.calls.clone();
        let fx = feedback.calls.clone();
        let timing = TimingCfg {
            interval_s: interval,
            ..TimingCfg::default()
        };
        let d = build_dispenser(
            sensor,
            pump,
            feedback,
            timing,
            PresenceCfg::default(),
            FeedbackCfg::default(),
            Some(Arc::new(clock.clone())),
            Some(Arc::new(log.clone())),
        )
        .unwrap();
        Self {
            d,
            clock,
            reads,
            pump: pump_calls,
            fx,
            log,
        }
    }

    pub fn reads(&self) -> u32 {
        *self.reads.lock().unwrap()
    }

    /// `set_flow(true)` calls so far.
    pub fn opens(&self) -> usize {
        self.pump.lock().unwrap().iter().filter(|(o, _)| *o).count()
    }

    pub fn alerts(&self) -> usize {
        self.fx
            .lock()
            .unwrap()
            .iter()
            .filter(|f| **f == Fx::Alert)
            .count()
    }

    pub fn colors(&self) -> Vec<Color> {
        self.fx
            .lock()
            .unwrap()
            .iter()
            .filter_map(|f| match f {
                Fx::Show(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// Forget everything recorded so far (e.g. after `begin()`).
    pub fn clear(&self) {
        self.pump.lock().unwrap().clear();
        self.fx.lock().unwrap().clear();
    }
}
