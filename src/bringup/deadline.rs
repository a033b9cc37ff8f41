//! Monotonic bring-up deadline.

use crate::app::ports::ClockPort;

/// Budget for one device to answer.
pub const BRINGUP_DEADLINE_MS: u64 = 5_000;

/// Pause between polls so the loop does not peg the core.
pub const POLL_INTERVAL_MS: u32 = 10;

/// A fixed point in monotonic time.  Started once per polling loop and
/// never moved.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started_ms: u64,
    budget_ms: u64,
}

impl Deadline {
    pub fn start(clock: &impl ClockPort, budget_ms: u64) -> Self {
        Self {
            started_ms: clock.now_ms(),
            budget_ms,
        }
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_ms)
    }

    pub fn expired(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) >= self.budget_ms
    }

    pub fn budget_ms(&self) -> u64 {
        self.budget_ms
    }
}
