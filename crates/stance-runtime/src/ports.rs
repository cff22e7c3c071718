//! Collaborator ports - what the monitor consumes and emits
//!
//! The monitor never imports a camera, model, speaker or storage backend
//! directly; it is handed implementations of these traits.

use std::future::Future;
use std::sync::Arc;

use stance_core::{LandmarkSample, Notification, NotificationKind, StanceResult};
use stance_posture::StatsSnapshot;
use tokio::sync::mpsc;

/// Pose detector. `Ok(None)` means nobody was detected; both that and an
/// error skip the tick.
pub trait Detector: Send + Sync + 'static {
    fn request_sample(&self) -> impl Future<Output = StanceResult<Option<LandmarkSample>>> + Send;
}

/// Sink for user-facing messages (fire-and-forget)
pub trait NotificationSink: Send + Sync + 'static {
    fn notify(&self, notification: Notification);
}

/// Audible alert (fire-and-forget, idempotent)
pub trait AudioAlert: Send + Sync + 'static {
    fn play_alert(&self);
}

/// Durable storage for the cumulative statistics
pub trait StatsStore: Send + Sync + 'static {
    fn load(&self) -> StanceResult<Option<StatsSnapshot>>;
    fn save(&self, snapshot: &StatsSnapshot) -> StanceResult<()>;
}

impl<T: Detector> Detector for Arc<T> {
    fn request_sample(&self) -> impl Future<Output = StanceResult<Option<LandmarkSample>>> + Send {
        (**self).request_sample()
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

impl<T: AudioAlert + ?Sized> AudioAlert for Arc<T> {
    fn play_alert(&self) {
        (**self).play_alert()
    }
}

impl<T: StatsStore + ?Sized> StatsStore for Arc<T> {
    fn load(&self) -> StanceResult<Option<StatsSnapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &StatsSnapshot) -> StanceResult<()> {
        (**self).save(snapshot)
    }
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => tracing::error!("{}", notification.message),
            NotificationKind::Warning => tracing::warn!("{}", notification.message),
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!(kind = ?notification.kind, "{}", notification.message)
            }
        }
    }
}

/// Forwards notifications to a presentation layer over a channel
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("notification receiver dropped");
        }
    }
}

/// No audio output
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioAlert for SilentAudio {
    fn play_alert(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_notifier_forwards() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(Notification::info("hello"));

        assert_eq!(rx.recv().await, Some(Notification::info("hello")));
    }

    #[test]
    fn test_channel_notifier_survives_dropped_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(Notification::error("nobody listens"));
    }
}
