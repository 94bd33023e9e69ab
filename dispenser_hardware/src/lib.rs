//! Peripheral adapters for the dispenser.
//!
//! Simulated adapters are always available. The Raspberry Pi drivers
//! (HC-SR04, GPIO switches, relay, WS2812 strip, buzzer) are built with the
//! `hardware` feature on Linux.

pub mod error;
pub mod sim;
pub mod util;
pub mod ws2812;

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod hardware;

pub use sim::{
    SimulatedFeedback, SimulatedPump, SimulatedRangeSensor, SimulatedSwitches, SwitchPresser,
};
