//! Tick clock - elapsed wall-clock time between assessed ticks
//!
//! Sampling is irregular (detector latency, skipped ticks), so accrual uses
//! the measured delta rather than the nominal tick period.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    last_lap: Instant,
}

impl TickClock {
    pub fn new(now: Instant) -> Self {
        TickClock { last_lap: now }
    }

    /// Restart measuring from `now`
    pub fn reset(&mut self, now: Instant) {
        self.last_lap = now;
    }

    /// Time since the previous lap; `now` becomes the new reference.
    /// A `now` earlier than the reference yields zero.
    pub fn lap(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last_lap);
        if now > self.last_lap {
            self.last_lap = now;
        }
        elapsed
    }

    /// Time since the previous lap without moving the reference
    pub fn peek(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_lap)
    }

    pub fn last_lap(&self) -> Instant {
        self.last_lap
    }
}
