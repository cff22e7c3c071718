//! Posture analyzer - baseline, score, stats and feedback for one user
//!
//! `analyze` runs a full tick. It is the only mutation path for the score
//! and the current-session counters while monitoring.

use std::time::Duration;

use stance_core::{feedback, Landmark, LandmarkSample, SensitivityLevel, StanceResult};

use crate::{
    classify, extract, CalibrationBaseline, Calibrator, Classification, PostureMetrics,
    ScoreState, ScoreUpdate, SessionStats,
};

/// Completed tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    /// Deviation from the baseline measured on this sample
    pub metrics: PostureMetrics,
    /// Verdict and the first reason that tripped it
    pub classification: Classification,
    /// Score step applied for the verdict
    pub score: ScoreUpdate,
    /// Time credited to the verdict
    pub elapsed: Duration,
}

/// What one tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No baseline yet; nothing was touched
    NotCalibrated,
    /// Required landmarks missing; only the feedback text changed
    LowConfidence { missing: Vec<Landmark> },
    Assessed(Assessment),
}

/// Per-user posture state
#[derive(Debug, Clone)]
pub struct PostureAnalyzer {
    /// Reference posture; empty until calibrated
    calibrator: Calibrator,
    /// Posture score and its status band
    score: ScoreState,
    /// Cumulative and running-session good/bad seconds
    stats: SessionStats,
    /// Message describing the last tick
    feedback: &'static str,
}

impl PostureAnalyzer {
    pub fn new() -> Self {
        Self::with_stats(SessionStats::new())
    }

    /// Start from previously stored statistics
    pub fn with_stats(stats: SessionStats) -> Self {
        PostureAnalyzer {
            calibrator: Calibrator::new(),
            score: ScoreState::new(),
            stats,
            feedback: feedback::NOT_CALIBRATED,
        }
    }

    /// Capture a baseline. On success the score resets to (100, Good).
    pub fn calibrate(&mut self, sample: LandmarkSample) -> StanceResult<&CalibrationBaseline> {
        let baseline = self.calibrator.calibrate(sample)?;
        self.score.reset();
        self.feedback = feedback::CALIBRATED;
        Ok(baseline)
    }

    pub fn clear_baseline(&mut self) {
        self.calibrator.clear();
    }

    /// Run extract -> classify -> score -> accrue for one sample.
    ///
    /// `elapsed` is only called when the tick is assessed, so time skipped by
    /// a low-confidence tick is credited to the next assessed one.
    pub fn analyze<F>(
        &mut self,
        sample: &LandmarkSample,
        sensitivity: SensitivityLevel,
        elapsed: F,
    ) -> TickOutcome
    where
        F: FnOnce() -> Duration,
    {
        let Some(baseline) = self.calibrator.baseline() else {
            return TickOutcome::NotCalibrated;
        };

        let missing = sample.missing_required(self.calibrator.threshold());
        if !missing.is_empty() {
            self.feedback = feedback::LOW_CONFIDENCE;
            return TickOutcome::LowConfidence { missing };
        }

        let metrics = match extract(sample, baseline) {
            Ok(metrics) => metrics,
            Err(_) => {
                self.feedback = feedback::LOW_CONFIDENCE;
                return TickOutcome::LowConfidence {
                    missing: sample.missing_required(self.calibrator.threshold()),
                };
            }
        };

        let classification = classify(&metrics, &sensitivity.profile());
        let score = self.score.apply(classification.verdict, sensitivity);
        let elapsed = elapsed();
        self.stats.accrue(classification.verdict, elapsed);
        self.feedback = classification.feedback();

        tracing::trace!(
            shoulder = metrics.shoulder_tilt_deg,
            neck = metrics.neck_tilt_deg,
            drift = metrics.vertical_drift_px,
            verdict = ?classification.verdict,
            score = score.state.score(),
            "tick assessed"
        );

        TickOutcome::Assessed(Assessment {
            metrics,
            classification,
            score,
            elapsed,
        })
    }

    pub fn baseline(&self) -> Option<&CalibrationBaseline> {
        self.calibrator.baseline()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrator.is_calibrated()
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    pub fn feedback(&self) -> &'static str {
        self.feedback
    }

    pub fn set_feedback(&mut self, text: &'static str) {
        self.feedback = text;
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut SessionStats {
        &mut self.stats
    }
}

impl Default for PostureAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
