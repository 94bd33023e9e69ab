//! Result of one controller tick, and running counters.

use dispenser_traits::Distance;

use crate::error::DispenserError;

/// Why a presence check did not find a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsentReason {
    /// Plausible reading beyond the presence threshold.
    OutOfRange(Distance),
    /// Zero, `NO_ECHO`, or beyond the sensor's rated range.
    Implausible(Distance),
    /// The sensor produced no reading.
    SensorFault(String),
}

/// Outcome of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Interval not elapsed yet; `elapsed` is the counter after this tick.
    Waiting { elapsed: u32 },
    /// Container present; pump opened for the dispense duration and closed.
    Dispensed { distance: Distance },
    /// No container; pump untouched, alert played.
    Absent(AbsentReason),
    /// The pump rejected a command; it has been asked to close.
    Faulted(DispenserError),
}

impl TickOutcome {
    /// True for every outcome that followed a presence check.
    pub fn checked(&self) -> bool {
        !matches!(self, TickOutcome::Waiting { .. })
    }
}

/// Running counters since `begin()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub ticks: u64,
    pub checks: u64,
    pub dispenses: u64,
    pub absences: u64,
    pub sensor_faults: u64,
    pub actuator_faults: u64,
    pub overrides: u64,
}
