use std::time::{Duration, Instant};

use crate::error::{HwError, Result};

/// Wait until `read()` reports `level`, or fail with `EchoTimeout` once
/// `timeout` expires. A zero `poll_interval` spins (needed for microsecond
/// pulse timing); anything else sleeps between reads.
pub fn wait_for_level(
    mut read: impl FnMut() -> bool,
    level: bool,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    while read() != level {
        if Instant::now() >= deadline {
            return Err(HwError::EchoTimeout);
        }
        if poll_interval.is_zero() {
            std::hint::spin_loop();
        } else {
            std::thread::sleep(poll_interval);
        }
    }
    Ok(())
}

/// Busy-wait for short trigger pulses where `thread::sleep` is too coarse.
#[inline]
pub fn spin_for(d: Duration) {
    let until = Instant::now() + d;
    while Instant::now() < until {
        std::hint::spin_loop();
    }
}
