#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the dispenser.
//!
//! Every section is optional and defaults to the firmware's built-in
//! constants, so an empty file is a valid configuration. `Config::validate`
//! rejects values the controller cannot run with.
use serde::Deserialize;
use std::path::Path;

/// BCM pin numbers.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Pins {
    /// HC-SR04 echo (through a 5V→3V3 divider)
    pub echo: u8,
    /// HC-SR04 trigger
    pub trigger: u8,
    /// "dispense now" switch
    pub switch_1: u8,
    /// "restart interval" switch
    pub switch_2: u8,
    /// pump relay
    pub pump: u8,
    /// buzzer (software PWM)
    pub buzzer: u8,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            echo: 3,
            trigger: 2,
            switch_1: 17,
            switch_2: 27,
            pump: 22,
            buzzer: 12,
        }
    }
}

impl Pins {
    fn all(&self) -> [(&'static str, u8); 6] {
        [
            ("echo", self.echo),
            ("trigger", self.trigger),
            ("switch_1", self.switch_1),
            ("switch_2", self.switch_2),
            ("pump", self.pump),
            ("buzzer", self.buzzer),
        ]
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Strip {
    /// Number of pixels on the WS2812 chain (data on SPI0 MOSI).
    pub length: usize,
    pub brightness_pct: u8,
}

impl Default for Strip {
    fn default() -> Self {
        Self {
            length: 8,
            brightness_pct: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Timing {
    /// Ticks between presence checks.
    pub interval_s: u32,
    /// Length of one tick (1000 on real hardware; shorter for simulation).
    pub tick_ms: u64,
    /// How long the pump stays open.
    pub dispense_ms: u64,
    /// Switch sampling period.
    pub poll_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            interval_s: 5,
            tick_ms: 1000,
            dispense_ms: 3000,
            poll_ms: 200,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Presence {
    /// Max distance counted as "container present".
    pub threshold_cm: u16,
    /// Readings above this are treated as implausible.
    pub max_plausible_cm: u16,
    /// Max wait for each HC-SR04 echo edge.
    pub echo_timeout_ms: u64,
}

impl Default for Presence {
    fn default() -> Self {
        Self {
            threshold_cm: 5,
            max_plausible_cm: 400,
            echo_timeout_ms: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SwitchCfg {
    /// Switches pull the line to ground when pressed.
    pub active_low: bool,
}

impl Default for SwitchCfg {
    fn default() -> Self {
        Self { active_low: true }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PumpCfg {
    /// Relay board energises on a low level.
    pub active_low: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    Never,
    Daily,
    Hourly,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Logging {
    /// Optional JSON-lines log file.
    pub file: Option<String>,
    /// "error" | "warn" | "info" | "debug" | "trace"
    pub level: Option<String>,
    pub rotation: Rotation,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub pins: Pins,
    pub strip: Strip,
    pub timing: Timing,
    pub presence: Presence,
    pub switches: SwitchCfg,
    pub pump: PumpCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
    let cfg = load_toml(&text)
        .map_err(|e| eyre::eyre!("invalid configuration in {}: {}", path.display(), e))?;
    cfg.validate()?;
    Ok(cfg)
}

/// BCM pin the WS2812 data line is fixed to.
const STRIP_MOSI: u8 = 10;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Timing
        if self.timing.interval_s == 0 {
            eyre::bail!("timing.interval_s must be >= 1");
        }
        if self.timing.interval_s > 7 * 24 * 60 * 60 {
            eyre::bail!("timing.interval_s is unreasonably large (>7 days)");
        }
        if self.timing.tick_ms == 0 {
            eyre::bail!("timing.tick_ms must be >= 1");
        }
        if self.timing.dispense_ms == 0 {
            eyre::bail!("timing.dispense_ms must be >= 1");
        }
        if self.timing.dispense_ms > 10 * 60 * 1000 {
            eyre::bail!("timing.dispense_ms is unreasonably large (>10min)");
        }
        if self.timing.poll_ms == 0 {
            eyre::bail!("timing.poll_ms must be >= 1");
        }

        // Presence
        if self.presence.threshold_cm == 0 {
            eyre::bail!("presence.threshold_cm must be >= 1");
        }
        if self.presence.max_plausible_cm == 0 || self.presence.max_plausible_cm == u16::MAX {
            eyre::bail!("presence.max_plausible_cm must be in [1, 65534]");
        }
        if self.presence.threshold_cm > self.presence.max_plausible_cm {
            eyre::bail!("presence.threshold_cm must be <= presence.max_plausible_cm");
        }
        if self.presence.echo_timeout_ms == 0 {
            eyre::bail!("presence.echo_timeout_ms must be >= 1");
        }

        // Strip
        if self.strip.brightness_pct > 100 {
            eyre::bail!("strip.brightness_pct must be in [0, 100]");
        }
        if self.strip.length == 0 {
            eyre::bail!("strip.length must be >= 1");
        }

        // Pins
        let pins = self.pins.all();
        for (i, (name, pin)) in pins.iter().enumerate() {
            if *pin > 27 {
                eyre::bail!("pins.{name} must be a BCM GPIO in [0, 27]");
            }
            if *pin == STRIP_MOSI {
                eyre::bail!("pins.{name} must not use GPIO {STRIP_MOSI} (SPI0 MOSI drives the strip)");
            }
            if let Some((other, _)) = pins[i + 1..].iter().find(|(_, p)| p == pin) {
                eyre::bail!("pins.{name} and pins.{other} must not share GPIO {pin}");
            }
        }

        // Logging
        if let Some(level) = &self.logging.level {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                eyre::bail!("logging.level must be one of {}", LOG_LEVELS.join("|"));
            }
        }

        Ok(())
    }
}
