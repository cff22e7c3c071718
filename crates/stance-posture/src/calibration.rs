//! Calibration - capture of the reference posture

use stance_core::{
    Landmark, LandmarkSample, StanceError, StanceResult, CONFIDENCE_THRESHOLD,
};

use crate::metrics::pair_mean_y;

/// Reference posture captured at calibration time
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationBaseline {
    sample: LandmarkSample,
    /// Mean y of both ears
    ear_y: f32,
    /// Mean y of both shoulders
    shoulder_y: f32,
}

impl CalibrationBaseline {
    /// Validate a sample and keep it as a baseline
    pub fn from_sample(sample: LandmarkSample, threshold: f32) -> StanceResult<Self> {
        let missing = sample.missing_required(threshold);
        if !missing.is_empty() {
            return Err(StanceError::CalibrationFailed { missing });
        }

        let ear_y = pair_mean_y(&sample, Landmark::LeftEar, Landmark::RightEar);
        let shoulder_y = pair_mean_y(&sample, Landmark::LeftShoulder, Landmark::RightShoulder);
        match (ear_y, shoulder_y) {
            (Some(ear_y), Some(shoulder_y)) => Ok(CalibrationBaseline {
                sample,
                ear_y,
                shoulder_y,
            }),
            _ => Err(StanceError::CalibrationFailed {
                missing: sample.missing_required(threshold),
            }),
        }
    }

    pub fn sample(&self) -> &LandmarkSample {
        &self.sample
    }

    pub fn ear_y(&self) -> f32 {
        self.ear_y
    }

    pub fn shoulder_y(&self) -> f32 {
        self.shoulder_y
    }

    /// Ear-to-shoulder vertical offset (ear y minus shoulder y)
    #[inline]
    pub fn vertical_gap(&self) -> f32 {
        self.ear_y - self.shoulder_y
    }
}

/// Holds at most one baseline; a rejected sample never replaces it
#[derive(Debug, Clone)]
pub struct Calibrator {
    baseline: Option<CalibrationBaseline>,
    threshold: f32,
}

impl Calibrator {
    pub fn new() -> Self {
        Self {
            baseline: None,
            threshold: CONFIDENCE_THRESHOLD,
        }
    }

    /// Accept `sample` as the new baseline or reject it.
    /// On rejection the previous baseline (if any) is kept.
    pub fn calibrate(&mut self, sample: LandmarkSample) -> StanceResult<&CalibrationBaseline> {
        match CalibrationBaseline::from_sample(sample, self.threshold) {
            Ok(baseline) => Ok(self.baseline.insert(baseline)),
            Err(err) => {
                tracing::warn!(%err, "calibration rejected");
                Err(err)
            }
        }
    }

    pub fn baseline(&self) -> Option<&CalibrationBaseline> {
        self.baseline.as_ref()
    }

    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Drop the baseline
    pub fn clear(&mut self) {
        self.baseline = None;
    }
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stance_core::{LandmarkPoint, REQUIRED_LANDMARKS};

    fn upright(confidence: f32) -> LandmarkSample {
        LandmarkSample::new()
            .with(Landmark::Nose, LandmarkPoint::new(330.0, 150.0, confidence))
            .with(Landmark::LeftEar, LandmarkPoint::new(290.0, 145.0, confidence))
            .with(Landmark::RightEar, LandmarkPoint::new(350.0, 145.0, confidence))
            .with(Landmark::LeftShoulder, LandmarkPoint::new(220.0, 260.0, confidence))
            .with(Landmark::RightShoulder, LandmarkPoint::new(420.0, 260.0, confidence))
    }

    #[test]
    fn test_calibrate_accepts_confident_sample() {
        let mut calibrator = Calibrator::new();
        let baseline = calibrator.calibrate(upright(0.9)).unwrap();

        assert_eq!(baseline.ear_y(), 145.0);
        assert_eq!(baseline.shoulder_y(), 260.0);
        assert_eq!(baseline.vertical_gap(), -115.0);
        assert!(calibrator.is_calibrated());
    }

    #[test]
    fn test_rejection_keeps_previous_baseline() {
        let mut calibrator = Calibrator::new();
        calibrator.calibrate(upright(0.9)).unwrap();
        let before = calibrator.baseline().cloned();

        let err = calibrator.calibrate(upright(0.3)).unwrap_err();
        assert_eq!(
            err,
            StanceError::CalibrationFailed {
                missing: REQUIRED_LANDMARKS.to_vec()
            }
        );
        assert_eq!(calibrator.baseline().cloned(), before);
    }

    #[test]
    fn test_missing_landmark_rejected() {
        let mut sample = LandmarkSample::new();
        for (landmark, point) in upright(0.9).iter() {
            if landmark != Landmark::Nose {
                sample.insert(landmark, *point);
            }
        }

        let mut calibrator = Calibrator::new();
        assert_eq!(
            calibrator.calibrate(sample).unwrap_err(),
            StanceError::CalibrationFailed {
                missing: vec![Landmark::Nose]
            }
        );
        assert!(!calibrator.is_calibrated());
    }

    #[test]
    fn test_recalibration_replaces_baseline() {
        let mut calibrator = Calibrator::new();
        calibrator.calibrate(upright(0.9)).unwrap();

        let lowered = upright(0.9).with(
            Landmark::LeftShoulder,
            LandmarkPoint::new(220.0, 280.0, 0.9),
        );
        calibrator.calibrate(lowered).unwrap();
        assert_eq!(calibrator.baseline().unwrap().shoulder_y(), 270.0);

        calibrator.clear();
        assert!(calibrator.baseline().is_none());
    }

    proptest! {
        #[test]
        fn prop_low_confidence_always_rejected(
            index in 0usize..5,
            confidence in 0.0f32..=0.5,
        ) {
            let mut calibrator = Calibrator::new();
            calibrator.calibrate(upright(0.95)).unwrap();
            let before = calibrator.baseline().cloned();

            let weak = REQUIRED_LANDMARKS[index];
            let point = *upright(0.95).get(weak).unwrap();
            let sample = upright(0.95)
                .with(weak, LandmarkPoint::new(point.x + 5.0, point.y, confidence));

            let rejected = matches!(
                calibrator.calibrate(sample),
                Err(StanceError::CalibrationFailed { .. })
            );
            prop_assert!(rejected);
            prop_assert_eq!(calibrator.baseline().cloned(), before);
        }
    }
}
