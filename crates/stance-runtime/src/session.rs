//! Session state - everything the monitor guards behind its lock

use chrono::{DateTime, Utc};
use serde::Serialize;
use stance_core::{MonitorConfig, PostureStatus};
use stance_posture::PostureAnalyzer;
use stance_time::{ReminderScheduler, TickClock};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Tick loop counters
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickCounters {
    /// Sampling ticks that reached the pipeline
    pub ticks: u64,
    /// Ticks scored and credited
    pub assessed: u64,
    /// Detector answered without a pose
    pub no_sample: u64,
    pub detector_errors: u64,
    /// Pose seen but a required landmark was below the confidence threshold
    pub low_confidence: u64,
    /// Audible bad-posture alerts played
    pub alerts: u64,
    pub reminders: u64,
}

/// Canonical session state
pub(crate) struct SessionCore {
    /// Baseline, score, statistics and feedback
    pub analyzer: PostureAnalyzer,
    /// Live configuration, read by every tick
    pub config: MonitorConfig,
    /// Next reminder deadline, armed only while monitoring
    pub reminder: ReminderScheduler,
    /// Measures the time credited to each assessed tick
    pub clock: TickClock,
    /// Session loop of the current monitoring session
    pub task: Option<JoinHandle<()>>,
    pub monitoring: bool,
    /// Detector failure already reported this session
    pub detection_warned: bool,
    /// Bumped on every start; a loop or tick holding an older value is stale
    pub epoch: u64,
    pub counters: TickCounters,
    /// Version of the last snapshot handed out for publishing
    pub version: u64,
}

impl SessionCore {
    pub fn new(analyzer: PostureAnalyzer, config: MonitorConfig) -> Self {
        SessionCore {
            analyzer,
            config,
            reminder: ReminderScheduler::new(),
            clock: TickClock::new(Instant::now()),
            task: None,
            monitoring: false,
            detection_warned: false,
            epoch: 0,
            counters: TickCounters::default(),
            version: 0,
        }
    }

    /// Whether a tick or timer started under `epoch` may still touch state
    pub fn is_live(&self, epoch: u64) -> bool {
        self.monitoring && self.epoch == epoch
    }

    /// Snapshot stamped with a fresh version, to be published.
    ///
    /// Must be called under the lock that guards `self`, so versions follow
    /// the order in which state changes were applied.
    pub fn publishable(&mut self) -> MonitorSnapshot {
        self.version += 1;
        self.snapshot()
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        let stats = self.analyzer.stats();
        let score = self.analyzer.score();
        MonitorSnapshot {
            version: self.version,
            monitoring: self.monitoring,
            calibrated: self.analyzer.is_calibrated(),
            score: score.score(),
            status: score.status(),
            feedback: self.analyzer.feedback().to_string(),
            good_time: stats.good_time(),
            bad_time: stats.bad_time(),
            current_good_time: stats.current_good_time(),
            current_bad_time: stats.current_bad_time(),
            sessions_count: stats.sessions_count(),
            last_session_timestamp: stats.last_session(),
            posture_ratio: stats.posture_ratio(),
            reminders_fired: self.reminder.fired(),
            counters: self.counters.clone(),
        }
    }
}

/// Read-only projection handed to observers
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSnapshot {
    /// Increases with every published state change; a lower version is stale
    pub version: u64,
    pub monitoring: bool,
    /// A baseline is in place
    pub calibrated: bool,
    /// Posture score, 0..=100
    pub score: u8,
    pub status: PostureStatus,
    /// Text shown to the user for the last tick
    pub feedback: String,
    /// Seconds in good posture, closed sessions only
    pub good_time: f64,
    /// Seconds in bad posture, closed sessions only
    pub bad_time: f64,
    /// Seconds in good posture in the running session
    pub current_good_time: f64,
    /// Seconds in bad posture in the running session
    pub current_bad_time: f64,
    pub sessions_count: u32,
    /// Start of the most recent session
    pub last_session_timestamp: Option<DateTime<Utc>>,
    /// Good share of all recorded time, in percent
    pub posture_ratio: u8,
    /// Reminders fired since the monitor was built
    pub reminders_fired: u64,
    pub counters: TickCounters,
}

impl MonitorSnapshot {
    pub fn total_good_time(&self) -> f64 {
        self.good_time + self.current_good_time
    }

    pub fn total_bad_time(&self) -> f64 {
        self.bad_time + self.current_bad_time
    }
}
