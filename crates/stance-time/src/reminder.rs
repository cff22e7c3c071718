//! Reminder scheduler - self-rescheduling one-shot timer
//!
//! `Idle --arm--> Armed --fire--> Armed (re-armed from the firing instant)`
//! `Armed --disarm--> Idle`
//!
//! The scheduler only keeps the deadline. The owner sleeps until
//! `deadline()` and calls `fire`; whether the reminder is still wanted
//! (monitoring active, reminders enabled) is the owner's decision.

use std::time::Duration;

use stance_core::ReminderInterval;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    Idle,
    Armed {
        interval: ReminderInterval,
        deadline: Instant,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct ReminderScheduler {
    state: ReminderState,
    fired: u64,
}

impl ReminderScheduler {
    pub fn new() -> Self {
        ReminderScheduler {
            state: ReminderState::Idle,
            fired: 0,
        }
    }

    /// Schedule the next wake-up `interval` after `now`, replacing any pending one
    pub fn arm(&mut self, interval: ReminderInterval, now: Instant) {
        self.state = ReminderState::Armed {
            interval,
            deadline: now + interval.duration(),
        };
    }

    /// Cancel any pending wake-up
    pub fn disarm(&mut self) {
        self.state = ReminderState::Idle;
    }

    /// If the deadline has passed, count a reminder and re-arm with the same
    /// interval from `now`. Returns whether a reminder is due.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.state {
            ReminderState::Armed { interval, deadline } if now >= deadline => {
                self.fired += 1;
                self.arm(interval, now);
                true
            }
            _ => false,
        }
    }

    pub fn state(&self) -> ReminderState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, ReminderState::Armed { .. })
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            ReminderState::Armed { deadline, .. } => Some(deadline),
            ReminderState::Idle => None,
        }
    }

    pub fn interval(&self) -> Option<ReminderInterval> {
        match self.state {
            ReminderState::Armed { interval, .. } => Some(interval),
            ReminderState::Idle => None,
        }
    }

    /// Time left until the wake-up
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Reminders fired since creation
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

impl Default for ReminderScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_minutes() -> ReminderInterval {
        ReminderInterval::new(5).unwrap()
    }

    #[test]
    fn test_starts_idle() {
        let mut scheduler = ReminderScheduler::new();
        assert_eq!(scheduler.state(), ReminderState::Idle);
        assert!(!scheduler.fire(Instant::now()));
    }

    #[test]
    fn test_fires_exactly_at_interval() {
        let start = Instant::now();
        let mut scheduler = ReminderScheduler::new();
        scheduler.arm(five_minutes(), start);

        assert!(!scheduler.fire(start + Duration::from_secs(299)));
        assert_eq!(scheduler.remaining(start + Duration::from_secs(299)), Some(Duration::from_secs(1)));
        assert!(scheduler.fire(start + Duration::from_secs(300)));
        assert_eq!(scheduler.fired(), 1);

        // re-armed from the firing instant
        assert_eq!(scheduler.deadline(), Some(start + Duration::from_secs(600)));
        assert!(!scheduler.fire(start + Duration::from_secs(599)));
        assert!(scheduler.fire(start + Duration::from_secs(600)));
        assert_eq!(scheduler.fired(), 2);
    }

    #[test]
    fn test_disarm_cancels() {
        let start = Instant::now();
        let mut scheduler = ReminderScheduler::new();
        scheduler.arm(five_minutes(), start);
        scheduler.disarm();

        assert!(!scheduler.is_armed());
        assert!(!scheduler.fire(start + Duration::from_secs(3600)));
        assert_eq!(scheduler.fired(), 0);
    }

    #[test]
    fn test_rearm_with_new_interval() {
        let start = Instant::now();
        let mut scheduler = ReminderScheduler::new();
        scheduler.arm(five_minutes(), start);

        let later = start + Duration::from_secs(120);
        scheduler.arm(ReminderInterval::new(10).unwrap(), later);

        assert_eq!(scheduler.interval().map(|i| i.minutes()), Some(10));
        assert!(!scheduler.fire(start + Duration::from_secs(300)));
        assert!(scheduler.fire(later + Duration::from_secs(600)));
    }
}
