//! Posture monitor - session lifecycle and the sampling loop
//!
//! One tokio task per monitoring session multiplexes three timers:
//! - sampling tick: detector -> extract -> classify -> score -> accrue
//! - reminder deadline: periodic check-in notification
//! - stats refresh: republish the snapshot, no mutation
//!
//! All canonical state sits in one `SessionCore` behind a mutex. A tick
//! mutates it inside a single critical section, and `stop` cancels the task,
//! disarms the reminder and folds the statistics inside another, so observers
//! never see a half-applied tick and no timer outlives its session.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use stance_core::{
    feedback, LandmarkSample, MonitorConfig, Notification, ReminderInterval, SensitivityLevel,
    Settings, StanceError, StanceResult,
};
use stance_posture::{
    CalibrationBaseline, ClosedSession, PostureAnalyzer, SessionStats, StatsSnapshot, TickOutcome,
};
use tokio::sync::{watch, Notify};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::session::{MonitorSnapshot, SessionCore, TickCounters};
use crate::{
    messages, AudioAlert, Detector, MemoryStatsStore, NotificationSink, SilentAudio, StatsStore,
    TracingNotifier,
};

struct Shared<D> {
    detector: D,
    notifier: Box<dyn NotificationSink>,
    audio: Box<dyn AudioAlert>,
    /// Loaded once at build, saved on start, stop and drop
    store: Box<dyn StatsStore>,
    core: Mutex<SessionCore>,
    /// Latest published snapshot; only ever moves to a higher version
    snapshot_tx: watch::Sender<MonitorSnapshot>,
    /// Wakes the loop after a configuration change
    reschedule: Notify,
}

/// Side effects collected under the lock, applied after it is released
#[derive(Default)]
struct Effects {
    notification: Option<Notification>,
    /// Play the alert sound
    alert: bool,
}

/// Configures a `Monitor` and its collaborators
pub struct MonitorBuilder<D> {
    detector: D,
    config: MonitorConfig,
    notifier: Box<dyn NotificationSink>,
    audio: Box<dyn AudioAlert>,
    store: Box<dyn StatsStore>,
    /// Overrides whatever `store` would load
    initial_stats: Option<StatsSnapshot>,
}

impl<D: Detector> MonitorBuilder<D> {
    pub fn config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn notifier(mut self, notifier: impl NotificationSink) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn audio(mut self, audio: impl AudioAlert) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn store(mut self, store: impl StatsStore) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Seed statistics directly instead of loading them from the store
    pub fn initial_stats(mut self, snapshot: StatsSnapshot) -> Self {
        self.initial_stats = Some(snapshot);
        self
    }

    pub fn build(self) -> Monitor<D> {
        let stored = match self.initial_stats {
            Some(snapshot) => Some(snapshot),
            None => match self.store.load() {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!(%err, "could not load stored statistics, starting empty");
                    None
                }
            },
        };

        let stats = stored
            .as_ref()
            .map(SessionStats::from_snapshot)
            .unwrap_or_default();
        debug!(
            sessions = stats.sessions_count(),
            good = stats.good_time(),
            bad = stats.bad_time(),
            "statistics loaded"
        );

        let core = SessionCore::new(PostureAnalyzer::with_stats(stats), self.config);
        let (snapshot_tx, _) = watch::channel(core.snapshot());

        Monitor {
            shared: Arc::new(Shared {
                detector: self.detector,
                notifier: self.notifier,
                audio: self.audio,
                store: self.store,
                core: Mutex::new(core),
                snapshot_tx,
                reschedule: Notify::new(),
            }),
        }
    }
}

/// Posture monitor
///
/// `start` must be called from within a tokio runtime.
pub struct Monitor<D: Detector> {
    shared: Arc<Shared<D>>,
}

impl<D: Detector> Monitor<D> {
    /// Builder with default collaborators: log notifications, no audio,
    /// in-memory statistics
    pub fn builder(detector: D) -> MonitorBuilder<D> {
        MonitorBuilder {
            detector,
            config: MonitorConfig::default(),
            notifier: Box::new(TracingNotifier),
            audio: Box::new(SilentAudio),
            store: Box::new(MemoryStatsStore::new()),
            initial_stats: None,
        }
    }

    pub fn new(detector: D, config: MonitorConfig) -> Self {
        Self::builder(detector).config(config).build()
    }

    /// Capture the reference posture.
    ///
    /// Waits `calibration_delay`, then takes one sample. A rejected sample
    /// leaves the previous baseline in place.
    pub async fn calibrate(&self) -> StanceResult<CalibrationBaseline> {
        let delay = self.shared.core.lock().config.calibration_delay;
        self.shared.notify(Notification::info(messages::CALIBRATION_BEGIN));
        if !delay.is_zero() {
            time::sleep(delay).await;
        }

        let sample = match self.shared.detector.request_sample().await {
            Ok(Some(sample)) => sample,
            Ok(None) => {
                warn!("calibration: no pose detected");
                self.shared
                    .notify(Notification::error(messages::CALIBRATION_NO_POSE));
                return Err(StanceError::DetectionUnavailable(
                    "no pose detected".to_string(),
                ));
            }
            Err(err) => {
                warn!(%err, "calibration: detector failed");
                self.shared
                    .notify(Notification::error(messages::CALIBRATION_NO_POSE));
                return Err(err);
            }
        };

        self.shared.calibrate_with(sample)
    }

    /// Begin a monitoring session.
    ///
    /// Requires a baseline. Counts a new session, arms the reminder when
    /// enabled and spawns the sampling loop.
    pub fn start(&self) -> StanceResult<()> {
        let (snapshot, stats) = {
            let mut core = self.shared.core.lock();
            if core.monitoring {
                return Err(StanceError::AlreadyMonitoring);
            }
            if !core.analyzer.is_calibrated() {
                drop(core);
                self.shared
                    .notify(Notification::warning(messages::START_UNCALIBRATED));
                return Err(StanceError::NotCalibrated);
            }

            let now = Instant::now();
            core.monitoring = true;
            core.epoch += 1;
            core.detection_warned = false;
            core.clock.reset(now);
            core.analyzer.stats_mut().on_session_start(Utc::now());
            if core.config.reminders_enabled {
                let interval = core.config.reminder_interval;
                core.reminder.arm(interval, now);
            }

            let epoch = core.epoch;
            core.task = Some(tokio::spawn(run_session(Arc::clone(&self.shared), epoch)));

            info!(
                epoch,
                sessions = core.analyzer.stats().sessions_count(),
                reminders = core.config.reminders_enabled,
                "monitoring started"
            );
            (core.publishable(), core.analyzer.stats().clone())
        };

        self.shared.persist(&stats);
        self.shared.publish(snapshot);
        self.shared
            .notify(Notification::success(messages::MONITORING_STARTED));
        Ok(())
    }

    /// End the session. Cancels the sampling loop and the reminder, folds
    /// the session counters into the totals and drops the baseline.
    pub fn stop(&self) -> StanceResult<ClosedSession> {
        let (closed, snapshot, stats) = {
            let mut core = self.shared.core.lock();
            if !core.monitoring {
                return Err(StanceError::NotMonitoring);
            }

            core.monitoring = false;
            core.reminder.disarm();
            if let Some(task) = core.task.take() {
                task.abort();
            }
            let closed = core.analyzer.stats_mut().on_session_stop();
            core.analyzer.clear_baseline();
            core.analyzer.set_feedback(feedback::NOT_CALIBRATED);

            info!(
                epoch = core.epoch,
                good = closed.good_time,
                bad = closed.bad_time,
                ratio = closed.posture_ratio(),
                "monitoring stopped"
            );
            (closed, core.publishable(), core.analyzer.stats().clone())
        };

        self.shared.persist(&stats);
        self.shared.publish(snapshot);
        self.shared
            .notify(Notification::info(messages::session_summary(&closed)));
        Ok(closed)
    }

    pub fn set_sensitivity(&self, sensitivity: SensitivityLevel) {
        self.update_config(|config| config.sensitivity = sensitivity);
    }

    pub fn set_audio_enabled(&self, enabled: bool) {
        self.update_config(|config| config.audio_enabled = enabled);
    }

    /// Disabling cancels the pending reminder; enabling arms a fresh one
    /// while monitoring.
    pub fn set_reminders_enabled(&self, enabled: bool) {
        self.update_config(|config| config.reminders_enabled = enabled);
    }

    /// A new interval while monitoring re-arms the reminder from now
    pub fn set_reminder_interval(&self, interval: ReminderInterval) {
        self.update_config(|config| config.reminder_interval = interval);
    }

    /// Apply an external settings document, clamping out-of-range values
    pub fn apply_settings(&self, settings: Settings) {
        let config = MonitorConfig::sanitize(settings);
        self.update_config(|current| *current = config);
    }

    fn update_config(&self, update: impl FnOnce(&mut MonitorConfig)) {
        let snapshot = {
            let mut core = self.shared.core.lock();
            update(&mut core.config);

            if core.monitoring {
                if core.config.reminders_enabled {
                    let interval = core.config.reminder_interval;
                    if core.reminder.interval() != Some(interval) {
                        core.reminder.arm(interval, Instant::now());
                        debug!(minutes = interval.minutes(), "reminder re-armed");
                    }
                } else if core.reminder.is_armed() {
                    core.reminder.disarm();
                    debug!("reminder disarmed");
                }
            }
            core.publishable()
        };

        self.shared.reschedule.notify_one();
        self.shared.publish(snapshot);
    }

    pub fn config(&self) -> MonitorConfig {
        self.shared.core.lock().config.clone()
    }

    pub fn settings(&self) -> Settings {
        self.config().to_settings()
    }

    /// Consistent view of the current state
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.shared.core.lock().snapshot()
    }

    /// Receive a new snapshot after every tick, refresh and lifecycle change
    pub fn subscribe(&self) -> watch::Receiver<MonitorSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Durable part of the statistics
    pub fn export_stats(&self) -> StatsSnapshot {
        self.shared.core.lock().analyzer.stats().snapshot()
    }

    pub fn baseline(&self) -> Option<CalibrationBaseline> {
        self.shared.core.lock().analyzer.baseline().cloned()
    }

    pub fn counters(&self) -> TickCounters {
        self.shared.core.lock().counters.clone()
    }

    pub fn is_monitoring(&self) -> bool {
        self.shared.core.lock().monitoring
    }

    pub fn is_calibrated(&self) -> bool {
        self.shared.core.lock().analyzer.is_calibrated()
    }

    /// Time until the next reminder, if one is armed
    pub fn next_reminder_in(&self) -> Option<Duration> {
        self.shared.core.lock().reminder.remaining(Instant::now())
    }
}

/// Dropping a monitor mid-session closes the session like `stop`, minus the
/// summary notification, so its time is folded and persisted.
impl<D: Detector> Drop for Monitor<D> {
    fn drop(&mut self) {
        let (snapshot, stats) = {
            let mut core = self.shared.core.lock();
            if let Some(task) = core.task.take() {
                task.abort();
            }
            if !core.monitoring {
                return;
            }

            core.monitoring = false;
            core.reminder.disarm();
            let closed = core.analyzer.stats_mut().on_session_stop();
            info!(
                epoch = core.epoch,
                good = closed.good_time,
                bad = closed.bad_time,
                "monitor dropped while monitoring, session closed"
            );
            (core.publishable(), core.analyzer.stats().clone())
        };

        self.shared.persist(&stats);
        self.shared.publish(snapshot);
    }
}

impl<D: Detector> Shared<D> {
    fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Publish unless a newer snapshot already went out. Snapshots are
    /// versioned under the core lock but sent after it is released, so a
    /// tick racing `stop` must not overwrite the stopped state.
    fn publish(&self, snapshot: MonitorSnapshot) {
        self.snapshot_tx.send_if_modified(|current| {
            if snapshot.version <= current.version {
                trace!(
                    version = snapshot.version,
                    current = current.version,
                    "stale snapshot dropped"
                );
                return false;
            }
            *current = snapshot;
            true
        });
    }

    fn persist(&self, stats: &SessionStats) {
        if stats.is_empty() {
            return;
        }
        if let Err(err) = self.store.save(&stats.snapshot()) {
            warn!(%err, "could not persist statistics");
        }
    }

    fn calibrate_with(&self, sample: LandmarkSample) -> StanceResult<CalibrationBaseline> {
        let (result, snapshot) = {
            let mut core = self.core.lock();
            let result = core.analyzer.calibrate(sample).cloned();
            (result, core.publishable())
        };

        match result {
            Ok(baseline) => {
                info!(
                    ear_y = baseline.ear_y(),
                    shoulder_y = baseline.shoulder_y(),
                    "calibration accepted"
                );
                self.publish(snapshot);
                self.notify(Notification::success(messages::CALIBRATION_ACCEPTED));
                Ok(baseline)
            }
            Err(err) => {
                self.notify(Notification::warning(messages::CALIBRATION_REJECTED));
                Err(err)
            }
        }
    }

    /// One sampling tick. The detector is awaited outside the lock; the
    /// pipeline runs inside it and is dropped if the session ended meanwhile.
    async fn run_tick(&self, epoch: u64) {
        let response = self.detector.request_sample().await;

        let mut effects = Effects::default();
        let snapshot = {
            let mut guard = self.core.lock();
            if !guard.is_live(epoch) {
                trace!(epoch, "stale tick dropped");
                return;
            }

            let core = &mut *guard;
            core.counters.ticks += 1;

            match response {
                Ok(None) => {
                    core.counters.no_sample += 1;
                    trace!("no pose in frame");
                }
                Err(err) => {
                    core.counters.detector_errors += 1;
                    if core.detection_warned {
                        debug!(%err, "detector failed");
                    } else {
                        core.detection_warned = true;
                        warn!(%err, "detector failed, skipping frames");
                        effects.notification =
                            Some(Notification::warning(messages::DETECTOR_FAILING));
                    }
                }
                Ok(Some(sample)) => {
                    let now = Instant::now();
                    let SessionCore {
                        analyzer,
                        clock,
                        config,
                        counters,
                        ..
                    } = &mut *core;

                    match analyzer.analyze(&sample, config.sensitivity, || clock.lap(now)) {
                        TickOutcome::NotCalibrated => {
                            debug!("tick without baseline");
                        }
                        TickOutcome::LowConfidence { missing } => {
                            counters.low_confidence += 1;
                            debug!(?missing, "low confidence tick");
                        }
                        TickOutcome::Assessed(assessment) => {
                            counters.assessed += 1;
                            if assessment.score.alert && config.audio_enabled {
                                counters.alerts += 1;
                                effects.alert = true;
                            }
                        }
                    }
                }
            }

            core.publishable()
        };

        if let Some(notification) = effects.notification {
            self.notify(notification);
        }
        if effects.alert {
            self.audio.play_alert();
        }
        self.publish(snapshot);
    }

    fn fire_reminder(&self, epoch: u64) {
        let (audio, snapshot) = {
            let mut core = self.core.lock();
            if !core.is_live(epoch) {
                return;
            }
            if !core.config.reminders_enabled {
                core.reminder.disarm();
                return;
            }
            if !core.reminder.fire(Instant::now()) {
                return;
            }
            core.counters.reminders += 1;
            debug!(fired = core.reminder.fired(), "posture reminder");
            (core.config.audio_enabled, core.publishable())
        };

        self.notify(Notification::info(messages::REMINDER));
        if audio {
            self.audio.play_alert();
        }
        self.publish(snapshot);
    }

    fn refresh(&self, epoch: u64) {
        let snapshot = {
            let mut core = self.core.lock();
            if !core.is_live(epoch) {
                return;
            }
            core.publishable()
        };
        self.publish(snapshot);
    }

    /// Periods and reminder deadline, or `None` once the session is over
    fn schedule(&self, epoch: u64) -> Option<(Duration, Duration, Option<Instant>)> {
        let core = self.core.lock();
        core.is_live(epoch).then(|| {
            (
                core.config.sample_interval,
                core.config.stats_refresh_interval,
                core.reminder.deadline(),
            )
        })
    }
}

fn periodic(period: Duration) -> Interval {
    let period = period.max(Duration::from_millis(1));
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn sleep_until_some(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn run_session<D: Detector>(shared: Arc<Shared<D>>, epoch: u64) {
    let Some((mut sample_period, mut refresh_period, _)) = shared.schedule(epoch) else {
        return;
    };
    let mut sampling = periodic(sample_period);
    let mut refresh = periodic(refresh_period);

    debug!(epoch, ?sample_period, ?refresh_period, "session loop running");

    loop {
        let Some((sample_next, refresh_next, deadline)) = shared.schedule(epoch) else {
            break;
        };
        if sample_next != sample_period {
            sample_period = sample_next;
            sampling = periodic(sample_period);
        }
        if refresh_next != refresh_period {
            refresh_period = refresh_next;
            refresh = periodic(refresh_period);
        }

        tokio::select! {
            _ = sampling.tick() => shared.run_tick(epoch).await,
            _ = sleep_until_some(deadline) => shared.fire_reminder(epoch),
            _ = refresh.tick() => shared.refresh(epoch),
            _ = shared.reschedule.notified() => trace!(epoch, "rescheduling"),
        }
    }

    debug!(epoch, "session loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use stance_core::{Landmark, LandmarkPoint, PostureStatus};

    fn upright() -> LandmarkSample {
        LandmarkSample::new()
            .with(Landmark::LeftEar, LandmarkPoint::new(300.0, 140.0, 0.9))
            .with(Landmark::RightEar, LandmarkPoint::new(360.0, 140.0, 0.9))
            .with(Landmark::Nose, LandmarkPoint::new(370.0, 143.0, 0.9))
            .with(Landmark::LeftShoulder, LandmarkPoint::new(230.0, 260.0, 0.9))
            .with(Landmark::RightShoulder, LandmarkPoint::new(430.0, 260.0, 0.9))
    }

    struct FixedDetector(Mutex<Option<LandmarkSample>>);

    impl FixedDetector {
        fn new(sample: Option<LandmarkSample>) -> Self {
            FixedDetector(Mutex::new(sample))
        }

        fn set(&self, sample: Option<LandmarkSample>) {
            *self.0.lock() = sample;
        }
    }

    impl Detector for FixedDetector {
        async fn request_sample(&self) -> StanceResult<Option<LandmarkSample>> {
            Ok(self.0.lock().clone())
        }
    }

    /// Holds every request until `release`
    struct GatedDetector {
        sample: LandmarkSample,
        gate: Notify,
        waiting: std::sync::atomic::AtomicUsize,
    }

    impl GatedDetector {
        fn new(sample: LandmarkSample) -> Self {
            GatedDetector {
                sample,
                gate: Notify::new(),
                waiting: std::sync::atomic::AtomicUsize::new(0),
            }
        }

        fn waiting(&self) -> usize {
            self.waiting.load(std::sync::atomic::Ordering::SeqCst)
        }

        fn release(&self) {
            self.gate.notify_one();
        }
    }

    impl Detector for GatedDetector {
        async fn request_sample(&self) -> StanceResult<Option<LandmarkSample>> {
            self.waiting.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.gate.notified().await;
            self.waiting.fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
            Ok(Some(self.sample.clone()))
        }
    }

    fn monitor(sample: Option<LandmarkSample>) -> Monitor<Arc<FixedDetector>> {
        Monitor::new(Arc::new(FixedDetector::new(sample)), MonitorConfig::immediate())
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_requires_calibration() {
        let monitor = monitor(Some(upright()));
        assert_eq!(monitor.start(), Err(StanceError::NotCalibrated));
        assert!(!monitor.is_monitoring());
    }

    #[tokio::test(start_paused = true)]
    async fn test_calibrate_without_pose() {
        let monitor = monitor(None);
        assert!(matches!(
            monitor.calibrate().await,
            Err(StanceError::DetectionUnavailable(_))
        ));
        assert!(!monitor.is_calibrated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_stop_cycle() {
        let monitor = monitor(Some(upright()));
        monitor.calibrate().await.unwrap();
        monitor.start().unwrap();
        assert_eq!(monitor.start(), Err(StanceError::AlreadyMonitoring));

        time::sleep(Duration::from_millis(1050)).await;

        let live = monitor.snapshot();
        assert!(live.monitoring);
        assert_eq!(live.sessions_count, 1);
        assert!(live.current_good_time > 0.9);
        assert_eq!(live.status, PostureStatus::Good);

        let closed = monitor.stop().unwrap();
        assert!(closed.good_time > 0.9);
        assert_eq!(monitor.stop(), Err(StanceError::NotMonitoring));

        let after = monitor.snapshot();
        assert!(!after.monitoring);
        assert!(!after.calibrated);
        assert_eq!(after.current_good_time, 0.0);
        assert!((after.good_time - closed.good_time).abs() < 1e-9);
        assert_eq!(after.feedback, feedback::NOT_CALIBRATED);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_sample_ticks_do_not_accrue() {
        let detector = Arc::new(FixedDetector::new(Some(upright())));
        let monitor = Monitor::new(Arc::clone(&detector), MonitorConfig::immediate());
        monitor.calibrate().await.unwrap();

        detector.set(None);
        monitor.start().unwrap();
        time::sleep(Duration::from_millis(550)).await;

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.current_good_time, 0.0);
        assert_eq!(snapshot.counters.assessed, 0);
        assert!(snapshot.counters.no_sample >= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_ticks() {
        let monitor = monitor(Some(upright()));
        let mut rx = monitor.subscribe();
        monitor.calibrate().await.unwrap();
        monitor.start().unwrap();

        time::sleep(Duration::from_millis(350)).await;
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().counters.assessed >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_snapshot_never_overwrites_stop() {
        let monitor = monitor(Some(upright()));
        let mut rx = monitor.subscribe();
        monitor.calibrate().await.unwrap();
        monitor.start().unwrap();
        time::sleep(Duration::from_millis(250)).await;

        // snapshot taken by a tick that has not published yet
        let in_flight = monitor.shared.core.lock().publishable();
        assert!(in_flight.monitoring);

        monitor.stop().unwrap();
        monitor.shared.publish(in_flight);

        let seen = rx.borrow_and_update().clone();
        assert!(!seen.monitoring);
        assert!(!seen.calibrated);
        assert_eq!(seen.current_good_time, 0.0);
        assert_eq!(seen, monitor.snapshot());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_pending_across_stop_is_dropped() {
        let detector = Arc::new(GatedDetector::new(upright()));
        let config = MonitorConfig {
            sample_interval: Duration::from_secs(3600),
            ..MonitorConfig::immediate()
        };
        let monitor = Monitor::builder(Arc::clone(&detector))
            .config(config)
            .build();
        monitor.shared.calibrate_with(upright()).unwrap();
        monitor.start().unwrap();

        let epoch = monitor.shared.core.lock().epoch;
        let shared = Arc::clone(&monitor.shared);
        let tick = tokio::spawn(async move { shared.run_tick(epoch).await });

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(detector.waiting(), 1);

        monitor.stop().unwrap();
        let before = monitor.snapshot();

        detector.release();
        tick.await.unwrap();

        let after = monitor.snapshot();
        assert_eq!(detector.waiting(), 0);
        assert_eq!(after, before);
        assert_eq!(after.counters.ticks, 0);
        assert_eq!(after.current_good_time, 0.0);
        assert_eq!(after.good_time, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_mid_session_folds_and_persists() {
        let store = Arc::new(MemoryStatsStore::new());
        let monitor = Monitor::builder(Arc::new(FixedDetector::new(Some(upright()))))
            .config(MonitorConfig::immediate())
            .store(Arc::clone(&store))
            .build();
        let rx = monitor.subscribe();
        monitor.calibrate().await.unwrap();
        monitor.start().unwrap();
        time::sleep(Duration::from_millis(1050)).await;

        drop(monitor);

        let saved = store.current().unwrap();
        assert_eq!(saved.sessions_count, 1);
        assert!(saved.good_time > 0.9);

        let last = rx.borrow().clone();
        assert!(!last.monitoring);
        assert_eq!(last.current_good_time, 0.0);
        assert!(last.good_time > 0.9);
    }
}
