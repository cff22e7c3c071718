//! Recording collaborators - capture what the monitor emits

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use stance_core::{Notification, NotificationKind};
use stance_runtime::{AudioAlert, NotificationSink};

/// Keeps every notification in order
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    log: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.log.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.log.lock().iter().map(|n| n.message.clone()).collect()
    }

    pub fn count_kind(&self, kind: NotificationKind) -> usize {
        self.log.lock().iter().filter(|n| n.kind == kind).count()
    }

    /// How many notifications carry exactly `message`
    pub fn count_message(&self, message: &str) -> usize {
        self.log.lock().iter().filter(|n| n.message == message).count()
    }

    pub fn last(&self) -> Option<Notification> {
        self.log.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.log.lock().clear();
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.log.lock().push(notification);
    }
}

/// Counts `play_alert` calls
#[derive(Clone, Default)]
pub struct CountingAudio {
    plays: Arc<AtomicU64>,
}

impl CountingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plays(&self) -> u64 {
        self.plays.load(Ordering::Relaxed)
    }
}

impl AudioAlert for CountingAudio {
    fn play_alert(&self) {
        self.plays.fetch_add(1, Ordering::Relaxed);
    }
}
