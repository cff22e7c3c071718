//! Metric extraction - landmark geometry to scalar posture metrics
//!
//! Angles use `atan2(dy, dx)` in image coordinates and keep only the
//! magnitude, so they range over 0..=180 degrees and the tilt direction is
//! not distinguished.

use stance_core::{Landmark, LandmarkPoint, LandmarkSample, StanceError, StanceResult};

use crate::CalibrationBaseline;

/// Per-tick posture metrics
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PostureMetrics {
    /// Angle of the left-to-right shoulder line, degrees
    pub shoulder_tilt_deg: f32,
    /// Angle of the ear-midpoint-to-nose line, degrees
    pub neck_tilt_deg: f32,
    /// Baseline ear/shoulder gap minus current gap, pixels
    pub vertical_drift_px: f32,
}

/// `|atan2(right.y - left.y, right.x - left.x)|` in degrees
pub fn shoulder_tilt_deg(left: &LandmarkPoint, right: &LandmarkPoint) -> f32 {
    (right.y - left.y).atan2(right.x - left.x).to_degrees().abs()
}

/// `|atan2(nose.y - mid.y, nose.x - mid.x)|` in degrees, mid = ear midpoint
pub fn neck_tilt_deg(nose: &LandmarkPoint, left_ear: &LandmarkPoint, right_ear: &LandmarkPoint) -> f32 {
    let mid = left_ear.midpoint(right_ear);
    (nose.y - mid.y).atan2(nose.x - mid.x).to_degrees().abs()
}

/// Mean y of a left/right pair, if both are present
pub fn pair_mean_y(sample: &LandmarkSample, left: Landmark, right: Landmark) -> Option<f32> {
    let left = sample.get(left)?;
    let right = sample.get(right)?;
    Some((left.y + right.y) / 2.0)
}

/// Mean ear y minus mean shoulder y
pub fn vertical_gap(sample: &LandmarkSample) -> Option<f32> {
    let ear_y = pair_mean_y(sample, Landmark::LeftEar, Landmark::RightEar)?;
    let shoulder_y = pair_mean_y(sample, Landmark::LeftShoulder, Landmark::RightShoulder)?;
    Some(ear_y - shoulder_y)
}

/// Extract metrics from `sample` relative to `baseline`.
///
/// The caller is expected to have gated the sample on landmark confidence;
/// a sample lacking a required landmark yields `LowConfidence`.
pub fn extract(
    sample: &LandmarkSample,
    baseline: &CalibrationBaseline,
) -> StanceResult<PostureMetrics> {
    let point = |landmark: Landmark| {
        sample.get(landmark).ok_or_else(|| StanceError::LowConfidence {
            missing: vec![landmark],
        })
    };

    let left_shoulder = point(Landmark::LeftShoulder)?;
    let right_shoulder = point(Landmark::RightShoulder)?;
    let left_ear = point(Landmark::LeftEar)?;
    let right_ear = point(Landmark::RightEar)?;
    let nose = point(Landmark::Nose)?;

    let ear_y = (left_ear.y + right_ear.y) / 2.0;
    let shoulder_y = (left_shoulder.y + right_shoulder.y) / 2.0;

    Ok(PostureMetrics {
        shoulder_tilt_deg: shoulder_tilt_deg(left_shoulder, right_shoulder),
        neck_tilt_deg: neck_tilt_deg(nose, left_ear, right_ear),
        vertical_drift_px: baseline.vertical_gap() - (ear_y - shoulder_y),
    })
}
