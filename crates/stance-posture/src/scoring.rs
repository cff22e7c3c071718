//! Scoring engine - bounded posture score driven by verdict history
//!
//! A good tick adds one point. A bad tick removes `max(1, 3 * level)` points.
//! The status after a bad tick depends on the score *before* the decrement:
//! above 50 it is `Warning`, otherwise `Bad`. This lags the Warning/Bad
//! boundary by one tick.

use serde::{Deserialize, Serialize};
use stance_core::{PostureStatus, SensitivityLevel, Verdict};

pub const MAX_SCORE: u8 = 100;

/// Bad ticks with a prior score above this report `Warning`
pub const WARNING_FLOOR: u8 = 50;

/// Audio alerts stop once the prior score is at or below this
pub const ALERT_FLOOR: u8 = 20;

/// Points removed by one bad tick
#[inline]
pub fn decrease_for(sensitivity: SensitivityLevel) -> u8 {
    (3 * sensitivity.multiplier()).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    /// 0..=100
    score: u8,
    /// Band the score falls in after the last verdict
    status: PostureStatus,
}

/// Result of one scoring step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    /// Score before this tick
    pub previous: u8,
    /// Score and status after this tick
    pub state: ScoreState,
    /// Status resolved to `Bad` while the prior score was above the alert floor
    pub alert: bool,
}

impl ScoreState {
    /// Full score, good status
    pub const fn new() -> Self {
        ScoreState {
            score: MAX_SCORE,
            status: PostureStatus::Good,
        }
    }

    #[inline]
    pub fn score(&self) -> u8 {
        self.score
    }

    #[inline]
    pub fn status(&self) -> PostureStatus {
        self.status
    }

    pub fn reset(&mut self) {
        *self = ScoreState::new();
    }

    /// Pure scoring step
    pub fn next(self, verdict: Verdict, sensitivity: SensitivityLevel) -> ScoreUpdate {
        let previous = self.score;

        let state = match verdict {
            Verdict::Good => ScoreState {
                score: previous.saturating_add(1).min(MAX_SCORE),
                status: PostureStatus::Good,
            },
            Verdict::Bad => ScoreState {
                score: previous.saturating_sub(decrease_for(sensitivity)),
                status: if previous > WARNING_FLOOR {
                    PostureStatus::Warning
                } else {
                    PostureStatus::Bad
                },
            },
        };

        ScoreUpdate {
            previous,
            state,
            alert: state.status == PostureStatus::Bad && previous > ALERT_FLOOR,
        }
    }

    /// Apply one scoring step in place
    pub fn apply(&mut self, verdict: Verdict, sensitivity: SensitivityLevel) -> ScoreUpdate {
        let update = self.next(verdict, sensitivity);
        *self = update.state;
        update
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decrease_per_level() {
        assert_eq!(decrease_for(SensitivityLevel::Low), 3);
        assert_eq!(decrease_for(SensitivityLevel::Medium), 6);
        assert_eq!(decrease_for(SensitivityLevel::High), 9);
    }

    #[test]
    fn test_single_bad_tick_medium() {
        let mut state = ScoreState::new();
        let update = state.apply(Verdict::Bad, SensitivityLevel::Medium);

        assert_eq!(update.previous, 100);
        assert_eq!(state.score(), 94);
        assert_eq!(state.status(), PostureStatus::Warning);
        assert!(!update.alert);
    }

    #[test]
    fn test_ten_bad_ticks_high() {
        let mut state = ScoreState::new();
        let mut scores = Vec::new();
        let mut statuses = Vec::new();

        for _ in 0..10 {
            state.apply(Verdict::Bad, SensitivityLevel::High);
            scores.push(state.score());
            statuses.push(state.status());
        }

        assert_eq!(scores, vec![91, 82, 73, 64, 55, 46, 37, 28, 19, 10]);
        // 6th tick has prior 55 -> still Warning; 7th has prior 46 -> Bad
        assert!(statuses[..6].iter().all(|s| *s == PostureStatus::Warning));
        assert!(statuses[6..].iter().all(|s| *s == PostureStatus::Bad));
    }

    #[test]
    fn test_alert_only_above_floor() {
        let mut state = ScoreState::new();
        let mut alerts = Vec::new();
        for _ in 0..10 {
            alerts.push(state.apply(Verdict::Bad, SensitivityLevel::High).alert);
        }

        // Bad from tick 7 (prior 46, 37, 28 alert), prior 19 and 10 do not
        assert_eq!(
            alerts,
            vec![false, false, false, false, false, false, true, true, true, false]
        );
    }

    #[test]
    fn test_good_tick_recovers_and_caps() {
        let mut state = ScoreState::new();
        state.apply(Verdict::Bad, SensitivityLevel::Low);
        assert_eq!(state.score(), 97);

        for _ in 0..10 {
            state.apply(Verdict::Good, SensitivityLevel::Low);
        }
        assert_eq!(state.score(), 100);
        assert_eq!(state.status(), PostureStatus::Good);
    }

    #[test]
    fn test_floor_at_zero() {
        let mut state = ScoreState::new();
        for _ in 0..50 {
            state.apply(Verdict::Bad, SensitivityLevel::High);
        }
        assert_eq!(state.score(), 0);
        assert_eq!(state.status(), PostureStatus::Bad);

        state.reset();
        assert_eq!(state, ScoreState::new());
    }

    fn verdict_strategy() -> impl Strategy<Value = Verdict> {
        prop_oneof![Just(Verdict::Good), Just(Verdict::Bad)]
    }

    fn level_strategy() -> impl Strategy<Value = SensitivityLevel> {
        prop_oneof![
            Just(SensitivityLevel::Low),
            Just(SensitivityLevel::Medium),
            Just(SensitivityLevel::High),
        ]
    }

    proptest! {
        #[test]
        fn prop_score_stays_bounded(
            ticks in prop::collection::vec((verdict_strategy(), level_strategy()), 0..400)
        ) {
            let mut state = ScoreState::new();
            for (verdict, level) in ticks {
                let update = state.apply(verdict, level);
                prop_assert!(update.state.score() <= MAX_SCORE);
                if verdict == Verdict::Good {
                    prop_assert_eq!(update.state.status(), PostureStatus::Good);
                }
            }
        }
    }
}
