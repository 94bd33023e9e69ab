//! The controller loop: one `Ticker` period per tick, pending switch
//! overrides applied first, pump closed on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};

use dispenser_traits::{Feedback, Pump, RangeSensor};

use crate::controller::DispenserCore;
use crate::poller::InputPoller;
use crate::status::{CycleStats, TickOutcome};
use crate::ticker::Ticker;

/// Why `run` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured tick limit was reached.
    TickLimit,
    /// The shutdown flag was raised (Ctrl-C).
    Shutdown,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub stats: CycleStats,
    pub stopped_by: StopReason,
    /// Tick deadlines missed, mostly because of dispense holds.
    pub overruns: u64,
}

/// Drive the controller until `shutdown` is raised or `max_ticks` ticks ran.
///
/// Order per period: wait for the deadline, apply every pending override
/// from `poller` in arrival order, then tick. The pump is closed and the
/// strip darkened before returning.
pub fn run<S, P, F>(
    dispenser: &mut DispenserCore<S, P, F>,
    poller: Option<&InputPoller>,
    shutdown: &AtomicBool,
    max_ticks: Option<u64>,
) -> RunReport
where
    S: RangeSensor,
    P: Pump,
    F: Feedback,
{
    dispenser.begin();
    let mut ticker = Ticker::new(dispenser.clock.clone(), dispenser.tick_period());
    tracing::info!(?max_ticks, "run start");

    let mut ticks: u64 = 0;
    let stopped_by = loop {
        if max_ticks.is_some_and(|max| ticks >= max) {
            break StopReason::TickLimit;
        }
        if shutdown.load(Ordering::Relaxed) {
            break StopReason::Shutdown;
        }
        ticker.wait();
        if shutdown.load(Ordering::Relaxed) {
            break StopReason::Shutdown;
        }

        if let Some(p) = poller {
            for event in p.drain() {
                dispenser.apply(event);
            }
        }

        let outcome = dispenser.tick();
        ticks += 1;
        match &outcome {
            TickOutcome::Waiting { .. } => {}
            TickOutcome::Faulted(e) => tracing::error!(error = %e, "cycle faulted"),
            other => tracing::debug!(outcome = ?other, "cycle finished"),
        }
    };

    dispenser.halt();
    let report = RunReport {
        stats: dispenser.stats(),
        stopped_by,
        overruns: ticker.overruns(),
    };
    tracing::info!(?report, "run stopped");
    report
}
