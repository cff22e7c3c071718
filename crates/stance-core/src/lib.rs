//! Stance Core - Fundamental types and primitives
//!
//! This crate defines the types used throughout the Stance posture monitor:
//! - Landmarks (Landmark, LandmarkPoint, LandmarkSample)
//! - Posture vocabulary (Verdict, PostureStatus, FeedbackReason, Notification)
//! - Configuration (SensitivityLevel, ReminderInterval, Settings, MonitorConfig)
//! - Error taxonomy

pub mod config;
pub mod error;
pub mod landmark;
pub mod posture;

pub use config::*;
pub use error::*;
pub use landmark::*;
pub use posture::*;
