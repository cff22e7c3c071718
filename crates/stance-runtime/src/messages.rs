//! User-facing notification texts

use stance_posture::{format_duration, ClosedSession};

pub const CALIBRATION_BEGIN: &str = "Sit with good posture for calibration...";
pub const CALIBRATION_NO_POSE: &str =
    "Could not detect your pose. Please make sure you are visible in the camera.";
pub const CALIBRATION_REJECTED: &str =
    "Could not detect key points clearly. Please adjust your position and try again.";
pub const CALIBRATION_ACCEPTED: &str =
    "Posture calibrated successfully! Start monitoring to analyze your posture.";
pub const START_UNCALIBRATED: &str =
    "Please calibrate your posture first before starting detection.";
pub const MONITORING_STARTED: &str = "Posture monitoring started!";
pub const MONITORING_STOPPED: &str = "Posture monitoring stopped.";
pub const REMINDER: &str = "Posture check reminder: Take a moment to check your posture!";
pub const DETECTOR_FAILING: &str =
    "Pose detection is not responding. Frames are skipped until it recovers.";

/// Stop notification with the closed session's summary
pub fn session_summary(closed: &ClosedSession) -> String {
    format!(
        "{} Good: {}, bad: {}, ratio {}%",
        MONITORING_STOPPED,
        format_duration(closed.good_time),
        format_duration(closed.bad_time),
        closed.posture_ratio()
    )
}
