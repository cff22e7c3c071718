//! Classifier - metrics against thresholds
//!
//! Every triggered rule marks the tick bad. The feedback reason follows rule
//! order: shoulders first, head tilt only if no reason yet, and slouching
//! overrides whatever was set before it.

use stance_core::{feedback, FeedbackReason, SensitivityProfile, Verdict};

use crate::PostureMetrics;

/// Drift beyond this many pixels counts as slouching (not sensitivity-scaled)
pub const SLOUCH_DRIFT_THRESHOLD_PX: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub verdict: Verdict,
    /// Set for `Warning` and `Bad`; the first check that failed
    pub reason: Option<FeedbackReason>,
}

impl Classification {
    pub const GOOD: Classification = Classification {
        verdict: Verdict::Good,
        reason: None,
    };

    /// Feedback text shown for this classification
    pub fn feedback(&self) -> &'static str {
        match (self.verdict, self.reason) {
            (_, Some(reason)) => reason.message(),
            (Verdict::Good, None) => feedback::GOOD,
            (Verdict::Bad, None) => feedback::NEEDS_CORRECTION,
        }
    }
}

pub fn classify(metrics: &PostureMetrics, profile: &SensitivityProfile) -> Classification {
    let mut verdict = Verdict::Good;
    let mut reason = None;

    if metrics.shoulder_tilt_deg > profile.shoulder_threshold_deg {
        verdict = Verdict::Bad;
        reason = Some(FeedbackReason::UnevenShoulders);
    }

    if metrics.neck_tilt_deg > profile.neck_threshold_deg {
        verdict = Verdict::Bad;
        reason = reason.or(Some(FeedbackReason::HeadTilted));
    }

    if metrics.vertical_drift_px > SLOUCH_DRIFT_THRESHOLD_PX {
        verdict = Verdict::Bad;
        reason = Some(FeedbackReason::Slouching);
    }

    Classification { verdict, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(shoulder: f32, neck: f32, drift: f32) -> PostureMetrics {
        PostureMetrics {
            shoulder_tilt_deg: shoulder,
            neck_tilt_deg: neck,
            vertical_drift_px: drift,
        }
    }

    #[test]
    fn test_good_posture() {
        let c = classify(&metrics(3.0, 5.0, 0.0), &SensitivityProfile::MEDIUM);
        assert_eq!(c, Classification::GOOD);
        assert_eq!(c.feedback(), "Good posture! Keep it up!");
    }

    #[test]
    fn test_uneven_shoulders() {
        let c = classify(&metrics(12.0, 5.0, 0.0), &SensitivityProfile::MEDIUM);
        assert_eq!(c.verdict, Verdict::Bad);
        assert_eq!(c.reason, Some(FeedbackReason::UnevenShoulders));
    }

    #[test]
    fn test_shoulders_win_over_head_by_order() {
        let c = classify(&metrics(12.0, 30.0, 0.0), &SensitivityProfile::MEDIUM);
        assert_eq!(c.reason, Some(FeedbackReason::UnevenShoulders));

        let c = classify(&metrics(2.0, 30.0, 0.0), &SensitivityProfile::MEDIUM);
        assert_eq!(c.reason, Some(FeedbackReason::HeadTilted));
    }

    #[test]
    fn test_slouch_overrides_everything() {
        let c = classify(&metrics(12.0, 30.0, 25.0), &SensitivityProfile::MEDIUM);
        assert_eq!(c.verdict, Verdict::Bad);
        assert_eq!(c.reason, Some(FeedbackReason::Slouching));
        assert_eq!(c.feedback(), "You appear to be slouching. Try sitting up straight.");
    }

    #[test]
    fn test_thresholds_are_strict() {
        let c = classify(&metrics(10.0, 15.0, 20.0), &SensitivityProfile::MEDIUM);
        assert_eq!(c, Classification::GOOD);
    }

    #[test]
    fn test_slouch_threshold_ignores_sensitivity() {
        for profile in [
            SensitivityProfile::LOW,
            SensitivityProfile::MEDIUM,
            SensitivityProfile::HIGH,
        ] {
            assert_eq!(classify(&metrics(0.0, 0.0, 20.5), &profile).verdict, Verdict::Bad);
            assert_eq!(classify(&metrics(0.0, 0.0, 19.5), &profile).verdict, Verdict::Good);
        }
    }

    #[test]
    fn test_profile_changes_angle_verdict() {
        let m = metrics(7.0, 12.0, 0.0);
        assert_eq!(classify(&m, &SensitivityProfile::LOW).verdict, Verdict::Good);
        assert_eq!(classify(&m, &SensitivityProfile::MEDIUM).verdict, Verdict::Good);
        assert_eq!(classify(&m, &SensitivityProfile::HIGH).verdict, Verdict::Bad);
    }
}
