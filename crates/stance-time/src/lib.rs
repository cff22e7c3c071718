//! Stance Time - clocks and timers for a monitoring session
//!
//! This crate implements:
//! - TickClock: wall-clock delta between assessed ticks
//! - ReminderScheduler: Idle/Armed state machine for periodic check-ins
//!
//! Both take `now` explicitly and use `tokio::time::Instant`, so a paused
//! tokio clock drives them deterministically in tests.

pub mod clock;
pub mod reminder;

pub use clock::*;
pub use reminder::*;
