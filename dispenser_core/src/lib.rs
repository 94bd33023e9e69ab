#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Core dispensing logic (hardware-agnostic).
//!
//! All peripheral access goes through the `dispenser_traits` capabilities:
//! `RangeSensor`, `Switches`, `Pump` and `Feedback`.
//!
//! ## Architecture
//!
//! - **Controller**: `DispenserCore`, one `tick()` per period (`controller` module)
//! - **Interval**: saturating tick counter gating presence checks (`counter`)
//! - **Overrides**: `InputEvent`s decoded from the switches (`event`)
//! - **Poller**: background switch sampling, newest event wins (`poller`)
//! - **Scheduling**: drift-free fixed-period `Ticker` (`ticker`)
//! - **Run loop**: begin, tick until stopped, halt (`runner`)
//!
//! The controller is the only owner of the interval counter. The poller
//! hands over override requests through a channel, and the run loop applies
//! them at the start of each period, before the counter advances.

pub mod builder;
pub mod config;
pub mod conversions;
pub mod controller;
pub mod counter;
pub mod error;
pub mod event;
pub mod hw_error;
pub mod logger;
pub mod mocks;
pub mod poller;
pub mod runner;
pub mod status;
pub mod ticker;

pub use builder::{Dispenser, DispenserBuilder, Missing, Set, build_dispenser};
pub use config::{DispenserCfg, FeedbackCfg, PresenceCfg, TimingCfg};
pub use controller::DispenserCore;
pub use counter::IntervalCounter;
pub use error::{BuildError, DispenserError, Result};
pub use event::{FeedbackState, InputEvent};
pub use logger::{Logger, MemoryLogger, TracingLogger};
pub use poller::InputPoller;
pub use runner::{RunReport, StopReason, run};
pub use status::{AbsentReason, CycleStats, TickOutcome};
pub use ticker::Ticker;
