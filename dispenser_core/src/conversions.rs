//! `From` implementations bridging `dispenser_config` types to runtime config.

use crate::config::{DispenserCfg, FeedbackCfg, PresenceCfg, TimingCfg};

// ── TimingCfg ────────────────────────────────────────────────────────────────

impl From<&dispenser_config::Timing> for TimingCfg {
    fn from(c: &dispenser_config::Timing) -> Self {
        Self {
            interval_s: c.interval_s,
            tick_ms: c.tick_ms,
            dispense_ms: c.dispense_ms,
            poll_ms: c.poll_ms,
        }
    }
}

// ── PresenceCfg ──────────────────────────────────────────────────────────────

impl From<&dispenser_config::Presence> for PresenceCfg {
    fn from(c: &dispenser_config::Presence) -> Self {
        Self {
            threshold_cm: c.threshold_cm,
            max_plausible_cm: c.max_plausible_cm,
        }
    }
}

// ── FeedbackCfg ──────────────────────────────────────────────────────────────

impl From<&dispenser_config::Strip> for FeedbackCfg {
    fn from(c: &dispenser_config::Strip) -> Self {
        Self {
            brightness_pct: c.brightness_pct,
        }
    }
}

impl From<&dispenser_config::Config> for DispenserCfg {
    fn from(c: &dispenser_config::Config) -> Self {
        Self {
            timing: (&c.timing).into(),
            presence: (&c.presence).into(),
            feedback: (&c.strip).into(),
        }
    }
}
