//! Fixed-interval tick scheduler
//!
//! Turns elapsed wall time into a whole number of simulation ticks. The
//! scheduler never looks at a clock itself: callers feed it durations, which
//! keeps the simulation testable without real-time delays.

use std::time::Duration;

/// Accumulator-based fixed-step timer
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    max_substeps: u32,
    accumulator: Duration,
    total_ticks: u64,
}

impl TickTimer {
    pub fn new(interval: Duration, max_substeps: u32) -> Self {
        Self {
            interval,
            max_substeps: max_substeps.max(1),
            accumulator: Duration::ZERO,
            total_ticks: 0,
        }
    }

    /// Tick length
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks handed out so far
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Add `elapsed` and return how many ticks are now due
    ///
    /// A single call never yields more than `max_substeps` ticks; time beyond
    /// that is dropped so a stalled frame cannot snowball.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }

        let max_frame = self.interval * self.max_substeps;
        self.accumulator += elapsed.min(max_frame);

        let mut due = 0;
        while self.accumulator >= self.interval && due < self.max_substeps {
            self.accumulator -= self.interval;
            due += 1;
        }
        if due == self.max_substeps {
            self.accumulator = self.accumulator.min(self.interval);
        }

        self.total_ticks += due as u64;
        due
    }

    /// Run `step` once per due tick; returns the number of ticks run
    pub fn run_due(&mut self, elapsed: Duration, mut step: impl FnMut()) -> u32 {
        let due = self.advance(elapsed);
        for _ in 0..due {
            step();
        }
        due
    }
}
