//! Fixed-period scheduling on top of `Clock`.
//!
//! Deadlines advance by exactly one period (`next = previous + period`), so
//! loop-body time does not accumulate as drift. If the body overruns a
//! deadline the schedule restarts from `now + period` and the caller still
//! waits that full period; missed ticks are dropped, never replayed in a
//! burst.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dispenser_traits::clock::Clock;

pub struct Ticker {
    clock: Arc<dyn Clock + Send + Sync>,
    period: Duration,
    next: Instant,
    overruns: u64,
}

impl Ticker {
    /// First deadline is one period from now. A zero period is raised to 1 ms.
    pub fn new(clock: Arc<dyn Clock + Send + Sync>, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let next = clock.now() + period;
        Self {
            clock,
            period,
            next,
            overruns: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Deadline the next `wait()` sleeps until.
    pub fn next_deadline(&self) -> Instant {
        self.next
    }

    /// Deadlines missed so far.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Block until the current deadline, then schedule the following one.
    ///
    /// After an overrun the deadline becomes `now + period`, so the next
    /// iteration is never started back to back with a late one.
    pub fn wait(&mut self) {
        let now = self.clock.now();
        if now > self.next {
            self.overruns += 1;
            tracing::trace!(
                late_ms = u64::try_from(now.duration_since(self.next).as_millis()).unwrap_or(u64::MAX),
                "tick overrun; resynchronising"
            );
            self.next = now + self.period;
        }
        self.clock.sleep_until(self.next);
        self.next += self.period;
    }
}
