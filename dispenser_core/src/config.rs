//! Runtime configuration for the dispensing controller.
//!
//! Defaults are the firmware constants below. They are separate from the
//! TOML schema in `dispenser_config`; see `conversions` for the mapping.

/// Ticks between presence checks.
pub const INTERVAL_SECONDS: u32 = 5;
/// Max distance counted as "container present".
pub const PRESENCE_THRESHOLD_CM: u16 = 5;
/// How long the pump stays open.
pub const DISPENSE_DURATION_SECONDS: u64 = 3;
/// Switch sampling cadence.
pub const POLL_PERIOD_MS: u64 = 200;
/// One controller tick.
pub const TICK_PERIOD_MS: u64 = 1000;
/// HC-SR04 rated range.
pub const MAX_PLAUSIBLE_CM: u16 = 400;

/// Timer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingCfg {
    /// Gate before the next presence check, in ticks.
    pub interval_s: u32,
    /// Length of one tick in milliseconds.
    pub tick_ms: u64,
    /// Pump open time in milliseconds.
    pub dispense_ms: u64,
    /// Input poller period in milliseconds.
    pub poll_ms: u64,
}

impl Default for TimingCfg {
    fn default() -> Self {
        Self {
            interval_s: INTERVAL_SECONDS,
            tick_ms: TICK_PERIOD_MS,
            dispense_ms: DISPENSE_DURATION_SECONDS * 1000,
            poll_ms: POLL_PERIOD_MS,
        }
    }
}

/// Presence decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceCfg {
    /// `distance <= threshold_cm` means a container is present.
    pub threshold_cm: u16,
    /// Readings above this (or zero, or `NO_ECHO`) count as absent.
    pub max_plausible_cm: u16,
}

impl Default for PresenceCfg {
    fn default() -> Self {
        Self {
            threshold_cm: PRESENCE_THRESHOLD_CM,
            max_plausible_cm: MAX_PLAUSIBLE_CM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackCfg {
    pub brightness_pct: u8,
}

impl Default for FeedbackCfg {
    fn default() -> Self {
        Self { brightness_pct: 30 }
    }
}

/// Everything the controller needs besides its adapters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispenserCfg {
    pub timing: TimingCfg,
    pub presence: PresenceCfg,
    pub feedback: FeedbackCfg,
}
