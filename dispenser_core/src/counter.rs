//! The interval counter gating presence checks.

/// Ticks elapsed since the last presence decision.
///
/// Invariant: `0 <= value <= interval`. `advance` saturates at `interval`,
/// so a forced counter stays in range on the following tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalCounter {
    value: u32,
    interval: u32,
}

impl IntervalCounter {
    /// `interval` is clamped to at least one tick.
    pub fn new(interval: u32) -> Self {
        Self {
            value: 0,
            interval: interval.max(1),
        }
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    #[inline]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Count one tick and return the new value.
    #[inline]
    pub fn advance(&mut self) -> u32 {
        self.value = self.value.saturating_add(1).min(self.interval);
        self.value
    }

    #[inline]
    pub fn is_elapsed(&self) -> bool {
        self.value >= self.interval
    }

    #[inline]
    pub fn reset(&mut self) {
        self.value = 0;
    }

    /// Make the next tick a presence check.
    #[inline]
    pub fn force(&mut self) {
        self.value = self.interval;
    }

    /// Ticks left until the next check.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.interval - self.value
    }
}
