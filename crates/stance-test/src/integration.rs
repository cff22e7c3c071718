//! End-to-end session tests
//!
//! Drives a real `Monitor` with a synthetic detector and recording
//! collaborators on a paused tokio clock:
//! - sampling, scoring and accrual through the full loop
//! - reminder timing, cancellation and re-arming
//! - statistics seeding and persistence across sessions
//! - stop racing an in-flight tick

use std::sync::Arc;
use std::time::Duration;

use stance_core::{MonitorConfig, StanceResult};
use stance_posture::{CalibrationBaseline, StatsSnapshot};
use stance_runtime::{MemoryStatsStore, Monitor, MonitorSnapshot};

use crate::recorders::{CountingAudio, RecordingNotifier};
use crate::synthetic::{upright, DetectorResponse, SyntheticDetector};

// ============================================================================
// SESSION HARNESS
// ============================================================================

/// A monitor wired to synthetic and recording collaborators
pub struct SessionHarness {
    /// Answers every sample request; script it to change posture
    pub detector: Arc<SyntheticDetector>,
    /// Every notification the monitor sent
    pub notifier: RecordingNotifier,
    /// Alert sound plays
    pub audio: CountingAudio,
    /// Statistics loaded at build and saved on start and stop
    pub store: Arc<MemoryStatsStore>,
    pub monitor: Monitor<Arc<SyntheticDetector>>,
}

impl SessionHarness {
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_store(config, MemoryStatsStore::new())
    }

    /// Harness whose monitor loads its statistics from `store`
    pub fn with_store(config: MonitorConfig, store: MemoryStatsStore) -> Self {
        let detector = Arc::new(SyntheticDetector::steady(upright()));
        let notifier = RecordingNotifier::new();
        let audio = CountingAudio::new();
        let store = Arc::new(store);

        let monitor = Monitor::builder(Arc::clone(&detector))
            .config(config)
            .notifier(notifier.clone())
            .audio(audio.clone())
            .store(Arc::clone(&store))
            .build();

        SessionHarness {
            detector,
            notifier,
            audio,
            store,
            monitor,
        }
    }

    /// Harness seeded with stored statistics
    pub fn seeded(config: MonitorConfig, snapshot: StatsSnapshot) -> Self {
        Self::with_store(config, MemoryStatsStore::seeded(snapshot))
    }

    /// Calibrate on the upright pose and restore it as the fallback answer
    pub async fn calibrate_upright(&self) -> StanceResult<CalibrationBaseline> {
        self.detector
            .set_fallback(DetectorResponse::Pose(upright()));
        self.monitor.calibrate().await
    }

    /// Calibrate upright, then start monitoring
    pub async fn begin(&self) -> StanceResult<()> {
        self.calibrate_upright().await?;
        self.monitor.start()
    }

    /// Let the session run on the (paused) tokio clock
    pub async fn run_for(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.monitor.snapshot()
    }
}

// ============================================================================
// TESTS
// ============================================================================
