//! Session statistics - time in good/bad posture
//!
//! Current-session counters accrue while monitoring and are folded into the
//! cumulative totals when the session stops. Only the cumulative part is
//! exported for durable storage.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stance_core::Verdict;

/// Durable part of the statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsSnapshot {
    /// Cumulative seconds in good posture, closed sessions only
    #[serde(alias = "goodPostureTime")]
    pub good_time: f64,
    /// Cumulative seconds in bad posture, closed sessions only
    #[serde(alias = "badPostureTime")]
    pub bad_time: f64,
    pub sessions_count: u32,
    /// Start of the most recent session
    #[serde(alias = "lastSession")]
    pub last_session_timestamp: Option<DateTime<Utc>>,
}

/// Good/bad seconds of one closed session
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClosedSession {
    /// Seconds credited to good posture
    pub good_time: f64,
    /// Seconds credited to bad posture
    pub bad_time: f64,
}

impl ClosedSession {
    pub fn posture_ratio(&self) -> u8 {
        ratio(self.good_time, self.bad_time)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    /// Closed sessions only
    good_time: f64,
    bad_time: f64,
    /// Running session; folded into the totals on stop
    current_good_time: f64,
    current_bad_time: f64,
    sessions_count: u32,
    /// Start of the most recent session
    last_session: Option<DateTime<Utc>>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a stored snapshot. Negative or non-finite times become 0.
    pub fn from_snapshot(snapshot: &StatsSnapshot) -> Self {
        SessionStats {
            good_time: sanitize_seconds(snapshot.good_time),
            bad_time: sanitize_seconds(snapshot.bad_time),
            current_good_time: 0.0,
            current_bad_time: 0.0,
            sessions_count: snapshot.sessions_count,
            last_session: snapshot.last_session_timestamp,
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            good_time: self.good_time,
            bad_time: self.bad_time,
            sessions_count: self.sessions_count,
            last_session_timestamp: self.last_session,
        }
    }

    /// Add wall-clock time to the current counter matching `verdict`
    pub fn accrue(&mut self, verdict: Verdict, elapsed: Duration) {
        let seconds = elapsed.as_secs_f64();
        match verdict {
            Verdict::Good => self.current_good_time += seconds,
            Verdict::Bad => self.current_bad_time += seconds,
        }
    }

    pub fn on_session_start(&mut self, now: DateTime<Utc>) {
        self.sessions_count += 1;
        self.last_session = Some(now);
    }

    /// Fold current counters into the totals and zero them
    pub fn on_session_stop(&mut self) -> ClosedSession {
        let closed = ClosedSession {
            good_time: self.current_good_time,
            bad_time: self.current_bad_time,
        };
        self.good_time += closed.good_time;
        self.bad_time += closed.bad_time;
        self.current_good_time = 0.0;
        self.current_bad_time = 0.0;
        closed
    }

    /// Percentage of good time over all time, 0 when nothing was recorded
    pub fn posture_ratio(&self) -> u8 {
        ratio(self.total_good_time(), self.total_bad_time())
    }

    pub fn total_good_time(&self) -> f64 {
        self.good_time + self.current_good_time
    }

    pub fn total_bad_time(&self) -> f64 {
        self.bad_time + self.current_bad_time
    }

    pub fn good_time(&self) -> f64 {
        self.good_time
    }

    pub fn bad_time(&self) -> f64 {
        self.bad_time
    }

    pub fn current_good_time(&self) -> f64 {
        self.current_good_time
    }

    pub fn current_bad_time(&self) -> f64 {
        self.current_bad_time
    }

    pub fn sessions_count(&self) -> u32 {
        self.sessions_count
    }

    pub fn last_session(&self) -> Option<DateTime<Utc>> {
        self.last_session
    }

    /// Nothing worth persisting yet
    pub fn is_empty(&self) -> bool {
        self.good_time == 0.0 && self.bad_time == 0.0 && self.sessions_count == 0
    }
}

fn ratio(good: f64, bad: f64) -> u8 {
    let total = good + bad;
    if total <= 0.0 {
        return 0;
    }
    (100.0 * good / total).round() as u8
}

fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// `45s` under a minute, `3m 5s` otherwise
pub fn format_duration(seconds: f64) -> String {
    let seconds = sanitize_seconds(seconds);
    if seconds < 60.0 {
        return format!("{}s", seconds.round());
    }
    let minutes = (seconds / 60.0).floor();
    let remainder = (seconds % 60.0).round();
    format!("{}m {}s", minutes, remainder)
}
