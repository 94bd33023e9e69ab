//! Type-state builder for `Dispenser` and generic `build_dispenser` constructor.
//!
//! The builder enforces at compile time that sensor, pump and feedback are
//! provided before `build()` is available. `try_build()` is always available
//! for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use dispenser_traits::clock::{Clock, MonotonicClock};
use dispenser_traits::{Feedback, Pump, RangeSensor};

use crate::config::{DispenserCfg, FeedbackCfg, PresenceCfg, TimingCfg};
use crate::controller::DispenserCore;
use crate::counter::IntervalCounter;
use crate::error::{BuildError, Result};
use crate::logger::{Logger, TracingLogger};
use crate::status::CycleStats;

/// Dynamically dispatched controller produced by `DispenserBuilder`.
pub type Dispenser = DispenserCore<Box<dyn RangeSensor>, Box<dyn Pump>, Box<dyn Feedback>>;

impl Dispenser {
    /// Start building a Dispenser.
    pub fn builder() -> DispenserBuilder<Missing, Missing, Missing> {
        DispenserBuilder::default()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Dispenser`. Configuration is validated on `build()`.
pub struct DispenserBuilder<S, P, F> {
    sensor: Option<Box<dyn RangeSensor>>,
    pump: Option<Box<dyn Pump>>,
    feedback: Option<Box<dyn Feedback>>,
    timing: Option<TimingCfg>,
    presence: Option<PresenceCfg>,
    feedback_cfg: Option<FeedbackCfg>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    logger: Option<Arc<dyn Logger + Send + Sync>>,
    _s: PhantomData<S>,
    _p: PhantomData<P>,
    _f: PhantomData<F>,
}

impl Default for DispenserBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self {
            sensor: None,
            pump: None,
            feedback: None,
            timing: None,
            presence: None,
            feedback_cfg: None,
            clock: None,
            logger: None,
            _s: PhantomData,
            _p: PhantomData,
            _f: PhantomData,
        }
    }
}

/// Validate configuration and construct a `DispenserCore`.
///
/// Single source of truth for both `DispenserBuilder::try_build()` and
/// `build_dispenser()`.
#[allow(clippy::too_many_arguments)]
fn validate_and_build<S: RangeSensor, P: Pump, F: Feedback>(
    sensor: S,
    pump: P,
    feedback: F,
    timing: TimingCfg,
    presence: PresenceCfg,
    feedback_cfg: FeedbackCfg,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    logger: Option<Arc<dyn Logger + Send + Sync>>,
) -> Result<DispenserCore<S, P, F>> {
    if timing.interval_s == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "interval_s must be >= 1",
        )));
    }
    if timing.tick_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "tick_ms must be >= 1",
        )));
    }
    if timing.dispense_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "dispense_ms must be >= 1",
        )));
    }
    if timing.poll_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "poll_ms must be >= 1",
        )));
    }
    if presence.threshold_cm == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "threshold_cm must be >= 1",
        )));
    }
    if presence.threshold_cm > presence.max_plausible_cm {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "threshold_cm must be <= max_plausible_cm",
        )));
    }
    if feedback_cfg.brightness_pct > 100 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "brightness_pct must be <= 100",
        )));
    }

    let clock = clock.unwrap_or_else(|| Arc::new(MonotonicClock::new()));
    let logger = logger.unwrap_or_else(|| Arc::new(TracingLogger));

    Ok(DispenserCore {
        sensor,
        pump,
        feedback,
        counter: IntervalCounter::new(timing.interval_s),
        timing,
        presence,
        feedback_cfg,
        clock,
        logger,
        stats: CycleStats::default(),
        flow_open: false,
    })
}

impl<S, P, F> DispenserBuilder<S, P, F> {
    /// Fallible build available in any type-state; names the missing piece.
    pub fn try_build(self) -> Result<Dispenser> {
        let sensor = self
            .sensor
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSensor))?;
        let pump = self
            .pump
            .ok_or_else(|| eyre::Report::new(BuildError::MissingPump))?;
        let feedback = self
            .feedback
            .ok_or_else(|| eyre::Report::new(BuildError::MissingFeedback))?;

        validate_and_build(
            sensor,
            pump,
            feedback,
            self.timing.unwrap_or_default(),
            self.presence.unwrap_or_default(),
            self.feedback_cfg.unwrap_or_default(),
            self.clock,
            self.logger,
        )
    }
}

/// Chainable setters that do not affect type-state.
impl<S, P, F> DispenserBuilder<S, P, F> {
    pub fn with_timing(mut self, timing: TimingCfg) -> Self {
        self.timing = Some(timing);
        self
    }
    pub fn with_presence(mut self, presence: PresenceCfg) -> Self {
        self.presence = Some(presence);
        self
    }
    pub fn with_feedback_cfg(mut self, cfg: FeedbackCfg) -> Self {
        self.feedback_cfg = Some(cfg);
        self
    }
    /// Set timing, presence and feedback in one go.
    pub fn with_config(self, cfg: DispenserCfg) -> Self {
        self.with_timing(cfg.timing)
            .with_presence(cfg.presence)
            .with_feedback_cfg(cfg.feedback)
    }
    /// Shorthand for the interval alone.
    pub fn with_interval(mut self, ticks: u32) -> Self {
        let mut t = self.timing.unwrap_or_default();
        t.interval_s = ticks;
        self.timing = Some(t);
        self
    }
    /// Provide a custom clock; defaults to `MonotonicClock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
    /// Provide a diagnostics sink; defaults to `TracingLogger`.
    pub fn with_logger(mut self, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        self.logger = Some(logger);
        self
    }
}

// Setters that advance type-state
impl<P, F> DispenserBuilder<Missing, P, F> {
    pub fn with_sensor(self, sensor: impl RangeSensor + 'static) -> DispenserBuilder<Set, P, F> {
        DispenserBuilder {
            sensor: Some(Box::new(sensor)),
            pump: self.pump,
            feedback: self.feedback,
            timing: self.timing,
            presence: self.presence,
            feedback_cfg: self.feedback_cfg,
            clock: self.clock,
            logger: self.logger,
            _s: PhantomData,
            _p: PhantomData,
            _f: PhantomData,
        }
    }
}

impl<S, F> DispenserBuilder<S, Missing, F> {
    pub fn with_pump(self, pump: impl Pump + 'static) -> DispenserBuilder<S, Set, F> {
        DispenserBuilder {
            sensor: self.sensor,
            pump: Some(Box::new(pump)),
            feedback: self.feedback,
            timing: self.timing,
            presence: self.presence,
            feedback_cfg: self.feedback_cfg,
            clock: self.clock,
            logger: self.logger,
            _s: PhantomData,
            _p: PhantomData,
            _f: PhantomData,
        }
    }
}

impl<S, P> DispenserBuilder<S, P, Missing> {
    pub fn with_feedback(self, feedback: impl Feedback + 'static) -> DispenserBuilder<S, P, Set> {
        DispenserBuilder {
            sensor: self.sensor,
            pump: self.pump,
            feedback: Some(Box::new(feedback)),
            timing: self.timing,
            presence: self.presence,
            feedback_cfg: self.feedback_cfg,
            clock: self.clock,
            logger: self.logger,
            _s: PhantomData,
            _p: PhantomData,
            _f: PhantomData,
        }
    }
}

impl DispenserBuilder<Set, Set, Set> {
    /// Validate and build. Only available once sensor, pump and feedback are set.
    pub fn build(self) -> Result<Dispenser> {
        self.try_build()
    }
}

/// Build a statically dispatched controller from concrete adapters.
///
/// Delegates to the shared `validate_and_build`.
#[allow(clippy::too_many_arguments)]
pub fn build_dispenser<S, P, F>(
    sensor: S,
    pump: P,
    feedback: F,
    timing: TimingCfg,
    presence: PresenceCfg,
    feedback_cfg: FeedbackCfg,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    logger: Option<Arc<dyn Logger + Send + Sync>>,
) -> Result<DispenserCore<S, P, F>>
where
    S: RangeSensor,
    P: Pump,
    F: Feedback,
{
    validate_and_build(
        sensor,
        pump,
        feedback,
        timing,
        presence,
        feedback_cfg,
        clock,
        logger,
    )
}
