//! Stance Runtime - monitoring session orchestration
//!
//! This crate wires the synchronous posture pipeline to time:
//! - `Monitor`: calibrate / start / stop and the per-session sampling loop
//! - ports: `Detector`, `NotificationSink`, `AudioAlert`, `StatsStore`
//! - `MonitorSnapshot`: read-only projection pushed to observers
//! - tracing setup for binaries

pub mod logging;
pub mod messages;
pub mod monitor;
pub mod persistence;
pub mod ports;
pub mod session;

pub use logging::{init_tracing, LogFormat};
pub use monitor::*;
pub use persistence::*;
pub use ports::*;
pub use session::{MonitorSnapshot, TickCounters};
