//! Monitor configuration
//!
//! `Settings` is the raw shape read from a user document; `MonitorConfig` is
//! the validated form the runtime works with. Values outside their domain are
//! either rejected (`MonitorConfig::try_from`) or clamped
//! (`MonitorConfig::sanitize`), never propagated as a crash.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{StanceError, StanceResult};

/// Angle thresholds for one sensitivity level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityProfile {
    /// Maximum shoulder-line tilt before shoulders count as uneven
    pub shoulder_threshold_deg: f32,
    /// Maximum ear-midpoint-to-nose angle before the head counts as tilted
    pub neck_threshold_deg: f32,
}

impl SensitivityProfile {
    pub const LOW: SensitivityProfile = SensitivityProfile {
        shoulder_threshold_deg: 15.0,
        neck_threshold_deg: 20.0,
    };

    pub const MEDIUM: SensitivityProfile = SensitivityProfile {
        shoulder_threshold_deg: 10.0,
        neck_threshold_deg: 15.0,
    };

    pub const HIGH: SensitivityProfile = SensitivityProfile {
        shoulder_threshold_deg: 5.0,
        neck_threshold_deg: 10.0,
    };
}

/// User-selected strictness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SensitivityLevel {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
}

impl SensitivityLevel {
    pub fn from_level(level: i64) -> StanceResult<Self> {
        match level {
            1 => Ok(SensitivityLevel::Low),
            2 => Ok(SensitivityLevel::Medium),
            3 => Ok(SensitivityLevel::High),
            value => Err(StanceError::ConfigurationOutOfRange {
                field: "sensitivityLevel",
                value,
            }),
        }
    }

    /// Nearest valid level
    pub fn clamped(level: i64) -> Self {
        match level {
            i64::MIN..=1 => SensitivityLevel::Low,
            2 => SensitivityLevel::Medium,
            _ => SensitivityLevel::High,
        }
    }

    #[inline]
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Score decay multiplier. Equal to the level, independent of the profile.
    #[inline]
    pub fn multiplier(self) -> u8 {
        self.level()
    }

    pub fn profile(self) -> SensitivityProfile {
        match self {
            SensitivityLevel::Low => SensitivityProfile::LOW,
            SensitivityLevel::Medium => SensitivityProfile::MEDIUM,
            SensitivityLevel::High => SensitivityProfile::HIGH,
        }
    }
}

/// Reminder period in whole minutes: 5..=60, step 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReminderInterval(u32);

impl ReminderInterval {
    pub const MIN_MINUTES: u32 = 5;
    pub const MAX_MINUTES: u32 = 60;
    pub const STEP_MINUTES: u32 = 5;
    pub const DEFAULT: ReminderInterval = ReminderInterval(20);

    pub fn new(minutes: i64) -> StanceResult<Self> {
        let in_range =
            (Self::MIN_MINUTES as i64..=Self::MAX_MINUTES as i64).contains(&minutes);
        if !in_range || minutes % Self::STEP_MINUTES as i64 != 0 {
            return Err(StanceError::ConfigurationOutOfRange {
                field: "reminderIntervalMinutes",
                value: minutes,
            });
        }
        Ok(ReminderInterval(minutes as u32))
    }

    /// Clamp into range, then round to the nearest step
    pub fn clamped(minutes: i64) -> Self {
        let clamped = minutes.clamp(Self::MIN_MINUTES as i64, Self::MAX_MINUTES as i64) as u32;
        let step = Self::STEP_MINUTES;
        ReminderInterval(((clamped + step / 2) / step) * step)
    }

    #[inline]
    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn duration(self) -> Duration {
        Duration::from_secs(self.0 as u64 * 60)
    }
}

impl Default for ReminderInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Raw user options, as stored in a settings document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// 1 (low) to 3 (high); clamped when sanitized
    pub sensitivity_level: i64,
    pub audio_enabled: bool,
    pub reminders_enabled: bool,
    /// 5 to 60, in steps of 5
    pub reminder_interval_minutes: i64,
    pub sample_interval_ms: u64,
    pub stats_refresh_interval_ms: u64,
    pub notification_ttl_ms: u64,
    pub calibration_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        MonitorConfig::default().to_settings()
    }
}

impl Settings {
    pub fn from_json_str(json: &str) -> StanceResult<Self> {
        serde_json::from_str(json).map_err(|e| StanceError::InvalidConfiguration(e.to_string()))
    }

    pub fn to_json_string(&self) -> StanceResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StanceError::InvalidConfiguration(e.to_string()))
    }
}

/// Validated monitor configuration
#[derive(Clone, Debug, PartialEq)]
pub struct MonitorConfig {
    /// Selects the threshold profile and the score penalties
    pub sensitivity: SensitivityLevel,
    /// Play the alert sound on bad posture and on reminders
    pub audio_enabled: bool,
    pub reminders_enabled: bool,
    /// Time between two posture reminders
    pub reminder_interval: ReminderInterval,
    /// Period of the analysis tick
    pub sample_interval: Duration,
    /// Period of the observer refresh (no state mutation)
    pub stats_refresh_interval: Duration,
    /// How long observers keep a notification on screen
    pub notification_ttl: Duration,
    /// Pause before the calibration sample so the user can sit up
    pub calibration_delay: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            sensitivity: SensitivityLevel::Medium,
            audio_enabled: true,
            reminders_enabled: true,
            reminder_interval: ReminderInterval::DEFAULT,
            sample_interval: Duration::from_millis(100),
            stats_refresh_interval: Duration::from_millis(1000),
            notification_ttl: Duration::from_millis(5000),
            calibration_delay: Duration::from_millis(2000),
        }
    }
}

impl MonitorConfig {
    /// Configuration for tests and scripted runs: no calibration pause
    pub fn immediate() -> Self {
        MonitorConfig {
            calibration_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Clamp every out-of-range value instead of rejecting it
    pub fn sanitize(settings: Settings) -> Self {
        let defaults = MonitorConfig::default();

        let sensitivity = SensitivityLevel::from_level(settings.sensitivity_level)
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "clamping sensitivity level");
                SensitivityLevel::clamped(settings.sensitivity_level)
            });

        let reminder_interval = ReminderInterval::new(settings.reminder_interval_minutes)
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "clamping reminder interval");
                ReminderInterval::clamped(settings.reminder_interval_minutes)
            });

        MonitorConfig {
            sensitivity,
            audio_enabled: settings.audio_enabled,
            reminders_enabled: settings.reminders_enabled,
            reminder_interval,
            sample_interval: non_zero_or(
                "sampleIntervalMs",
                settings.sample_interval_ms,
                defaults.sample_interval,
            ),
            stats_refresh_interval: non_zero_or(
                "statsRefreshIntervalMs",
                settings.stats_refresh_interval_ms,
                defaults.stats_refresh_interval,
            ),
            notification_ttl: Duration::from_millis(settings.notification_ttl_ms),
            calibration_delay: Duration::from_millis(settings.calibration_delay_ms),
        }
    }

    pub fn to_settings(&self) -> Settings {
        Settings {
            sensitivity_level: self.sensitivity.level() as i64,
            audio_enabled: self.audio_enabled,
            reminders_enabled: self.reminders_enabled,
            reminder_interval_minutes: self.reminder_interval.minutes() as i64,
            sample_interval_ms: self.sample_interval.as_millis() as u64,
            stats_refresh_interval_ms: self.stats_refresh_interval.as_millis() as u64,
            notification_ttl_ms: self.notification_ttl.as_millis() as u64,
            calibration_delay_ms: self.calibration_delay.as_millis() as u64,
        }
    }
}

impl TryFrom<Settings> for MonitorConfig {
    type Error = StanceError;

    fn try_from(settings: Settings) -> StanceResult<Self> {
        for (field, value) in [
            ("sampleIntervalMs", settings.sample_interval_ms),
            ("statsRefreshIntervalMs", settings.stats_refresh_interval_ms),
        ] {
            if value == 0 {
                return Err(StanceError::ConfigurationOutOfRange { field, value: 0 });
            }
        }

        Ok(MonitorConfig {
            sensitivity: SensitivityLevel::from_level(settings.sensitivity_level)?,
            audio_enabled: settings.audio_enabled,
            reminders_enabled: settings.reminders_enabled,
            reminder_interval: ReminderInterval::new(settings.reminder_interval_minutes)?,
            sample_interval: Duration::from_millis(settings.sample_interval_ms),
            stats_refresh_interval: Duration::from_millis(settings.stats_refresh_interval_ms),
            notification_ttl: Duration::from_millis(settings.notification_ttl_ms),
            calibration_delay: Duration::from_millis(settings.calibration_delay_ms),
        })
    }
}

fn non_zero_or(field: &'static str, millis: u64, fallback: Duration) -> Duration {
    if millis == 0 {
        tracing::warn!(field, "zero period, using default");
        fallback
    } else {
        Duration::from_millis(millis)
    }
}
