//! Error types for Stance

use thiserror::Error;

use crate::Landmark;

/// Core Stance errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StanceError {
    // Detector errors
    #[error("Detection unavailable: {0}")]
    DetectionUnavailable(String),

    // Landmark errors
    #[error("Calibration failed: missing or low-confidence {}", landmark_list(.missing))]
    CalibrationFailed { missing: Vec<Landmark> },

    #[error("Low confidence tick: missing or low-confidence {}", landmark_list(.missing))]
    LowConfidence { missing: Vec<Landmark> },

    // Configuration errors
    #[error("Configuration out of range: {field} = {value}")]
    ConfigurationOutOfRange { field: &'static str, value: i64 },

    #[error("Invalid configuration document: {0}")]
    InvalidConfiguration(String),

    // Session errors
    #[error("Posture not calibrated")]
    NotCalibrated,

    #[error("Monitoring already active")]
    AlreadyMonitoring,

    #[error("Monitoring not active")]
    NotMonitoring,

    // Storage errors
    #[error("Persistence error: {0}")]
    Persistence(String),
}

fn landmark_list(landmarks: &[Landmark]) -> String {
    landmarks
        .iter()
        .map(|l| l.part_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for Stance operations
pub type StanceResult<T> = Result<T, StanceError>;
