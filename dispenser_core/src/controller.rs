//! The dispensing controller (`DispenserCore`).
//!
//! One `tick()` per period: advance the interval counter, and when it
//! elapses take exactly one distance reading and either run a timed
//! dispense or signal absence. Manual overrides arrive through `apply()`
//! and only move the counter; the presence check is the only path that
//! opens the pump.

use std::sync::Arc;
use std::time::Duration;

use dispenser_traits::clock::Clock;
use dispenser_traits::{Color, Distance, Feedback, Pump, RangeSensor};

use crate::config::{FeedbackCfg, PresenceCfg, TimingCfg};
use crate::counter::IntervalCounter;
use crate::error::DispenserError;
use crate::event::{FeedbackState, InputEvent};
use crate::hw_error::{map_feedback_error, map_hw_error, map_sensor_error};
use crate::logger::Logger;
use crate::status::{AbsentReason, CycleStats, TickOutcome};

pub struct DispenserCore<S: RangeSensor, P: Pump, F: Feedback> {
    pub(crate) sensor: S,
    pub(crate) pump: P,
    pub(crate) feedback: F,
    pub(crate) timing: TimingCfg,
    pub(crate) presence: PresenceCfg,
    pub(crate) feedback_cfg: FeedbackCfg,
    pub(crate) counter: IntervalCounter,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) logger: Arc<dyn Logger + Send + Sync>,
    pub(crate) stats: CycleStats,
    pub(crate) flow_open: bool,
}

impl<S: RangeSensor, P: Pump, F: Feedback> core::fmt::Debug for DispenserCore<S, P, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DispenserCore")
            .field("counter", &self.counter.value())
            .field("interval", &self.counter.interval())
            .field("flow_open", &self.flow_open)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<S: RangeSensor, P: Pump, F: Feedback> DispenserCore<S, P, F> {
    /// Ticks counted towards the next presence check.
    pub fn counter(&self) -> u32 {
        self.counter.value()
    }

    pub fn timing(&self) -> &TimingCfg {
        &self.timing
    }

    pub fn presence(&self) -> &PresenceCfg {
        &self.presence
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    /// Whether the last pump command left the fluid path open.
    pub fn is_flowing(&self) -> bool {
        self.flow_open
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.timing.tick_ms)
    }

    pub fn dispense_duration(&self) -> Duration {
        Duration::from_millis(self.timing.dispense_ms)
    }

    /// Startup: force the pump closed, apply brightness, show the idle color.
    pub fn begin(&mut self) {
        self.counter.reset();
        self.stats = CycleStats::default();
        self.logger.log("dispenser starting");
        tracing::info!(
            interval = self.timing.interval_s,
            tick_ms = self.timing.tick_ms,
            threshold_cm = self.presence.threshold_cm,
            dispense_ms = self.timing.dispense_ms,
            "controller init"
        );
        if let Err(e) = self.close_pump() {
            tracing::warn!(error = %e, "could not force pump closed at startup");
        }
        if let Err(e) = self.feedback.set_brightness(self.feedback_cfg.brightness_pct) {
            tracing::warn!(error = %map_feedback_error(&*e), "set_brightness failed");
        }
        self.show(FeedbackState::Idle);
    }

    /// Apply one operator override. Never touches the pump.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::None => return,
            InputEvent::ForceDispense => {
                self.counter.force();
                self.logger.log("switch 1 pressed, dispensing on next tick");
            }
            InputEvent::ResetTimer => {
                self.counter.reset();
                self.logger.log("switch 2 pressed, interval restarted");
            }
        }
        self.stats.overrides += 1;
        tracing::debug!(?event, counter = self.counter.value(), "override applied");
    }

    /// One controller period.
    pub fn tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;
        let elapsed = self.counter.advance();
        if !self.counter.is_elapsed() {
            tracing::trace!(elapsed, interval = self.counter.interval(), "waiting");
            return TickOutcome::Waiting { elapsed };
        }

        self.counter.reset();
        self.stats.checks += 1;
        self.logger.log("interval elapsed, checking container");

        match self.check_presence() {
            Ok(distance) => {
                self.logger.log(&format!("container present at {distance}"));
                self.show(FeedbackState::PresenceConfirmed);
                self.dispense(distance)
            }
            Err(reason) => {
                self.signal_absent(&reason);
                TickOutcome::Absent(reason)
            }
        }
    }

    /// Close the pump and darken the strip. Used when the run loop stops.
    pub fn halt(&mut self) {
        if let Err(e) = self.close_pump() {
            tracing::error!(error = %e, "pump did not acknowledge close on halt");
        }
        if let Err(e) = self.feedback.show_all(Color::Off) {
            tracing::warn!(error = %map_feedback_error(&*e), "strip off failed");
        }
        self.logger.log("dispenser stopped");
    }

    fn check_presence(&mut self) -> Result<Distance, AbsentReason> {
        let distance = match self.sensor.read_distance() {
            Ok(d) => d,
            Err(e) => {
                let err = map_sensor_error(&*e);
                self.stats.sensor_faults += 1;
                tracing::warn!(error = %err, "sensor read failed; treating as absent");
                return Err(AbsentReason::SensorFault(err.to_string()));
            }
        };
        tracing::debug!(distance_cm = distance.cm(), "presence reading");

        if !distance.is_plausible(self.presence.max_plausible_cm) {
            return Err(AbsentReason::Implausible(distance));
        }
        if distance.cm() > self.presence.threshold_cm {
            return Err(AbsentReason::OutOfRange(distance));
        }
        Ok(distance)
    }

    fn signal_absent(&mut self, reason: &AbsentReason) {
        self.stats.absences += 1;
        let line = match reason {
            AbsentReason::OutOfRange(d) => format!("no container ({d}), not dispensing"),
            AbsentReason::Implausible(d) => {
                format!("implausible reading ({d}), not dispensing")
            }
            AbsentReason::SensorFault(e) => format!("sensor failed ({e}), not dispensing"),
        };
        self.logger.log(&line);
        self.show(FeedbackState::Absent);
        if let Err(e) = self.feedback.alert() {
            tracing::warn!(error = %map_feedback_error(&*e), "alert failed");
        }
    }

    fn dispense(&mut self, distance: Distance) -> TickOutcome {
        self.show(FeedbackState::Dispensing);
        self.logger.log("dispensing");

        if let Err(e) = self.pump.set_flow(true) {
            let err = DispenserError::Actuator(format!("open: {}", map_hw_error(&*e)));
            self.stats.actuator_faults += 1;
            tracing::error!(error = %err, "pump open failed; closing");
            // close_pump logs its own failure
            let _ = self.close_pump();
            return TickOutcome::Faulted(err);
        }
        self.flow_open = true;
        self.logger.log("pump on");

        self.clock.sleep(self.dispense_duration());

        self.show(FeedbackState::DispenseComplete);
        match self.close_pump() {
            Ok(()) => {
                self.stats.dispenses += 1;
                tracing::info!(distance_cm = distance.cm(), "dispense complete");
                TickOutcome::Dispensed { distance }
            }
            Err(err) => {
                self.stats.actuator_faults += 1;
                TickOutcome::Faulted(err)
            }
        }
    }

    fn close_pump(&mut self) -> Result<(), DispenserError> {
        match self.pump.set_flow(false) {
            Ok(()) => {
                if self.flow_open {
                    self.logger.log("pump off");
                }
                self.flow_open = false;
                Ok(())
            }
            Err(e) => {
                let err = DispenserError::Actuator(format!("close: {}", map_hw_error(&*e)));
                tracing::error!(error = %err, "pump close failed");
                Err(err)
            }
        }
    }

    fn show(&mut self, state: FeedbackState) {
        if let Err(e) = self.feedback.show_all(state.color()) {
            tracing::warn!(error = %map_feedback_error(&*e), ?state, "feedback update failed");
        }
    }
}
