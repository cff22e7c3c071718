//! Posture vocabulary shared by the analysis pipeline and the runtime

use serde::{Deserialize, Serialize};

/// Per-tick binary assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Good,
    Bad,
}

impl Verdict {
    #[inline]
    pub fn is_good(self) -> bool {
        self == Verdict::Good
    }
}

/// Three-level status shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostureStatus {
    #[default]
    Good,
    Warning,
    Bad,
}

/// Why a tick was judged bad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeedbackReason {
    UnevenShoulders,
    HeadTilted,
    Slouching,
}

impl FeedbackReason {
    /// Guidance text for the user
    pub fn message(self) -> &'static str {
        match self {
            FeedbackReason::UnevenShoulders => {
                "Shoulders are uneven. Try to level your shoulders."
            }
            FeedbackReason::HeadTilted => "Head is tilted. Try to keep your head centered.",
            FeedbackReason::Slouching => "You appear to be slouching. Try sitting up straight.",
        }
    }
}

/// Feedback texts that are not tied to a reason
pub mod feedback {
    pub const NOT_CALIBRATED: &str = "Calibrate your posture to begin analysis.";
    pub const CALIBRATED: &str = "Posture calibrated. Start monitoring to begin tracking.";
    pub const GOOD: &str = "Good posture! Keep it up!";
    pub const NEEDS_CORRECTION: &str = "Posture needs correction.";
    pub const LOW_CONFIDENCE: &str = "Not all key points detected. Please adjust your position.";
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// User-facing message. Fire-and-forget; expiry is the observer's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }
}
