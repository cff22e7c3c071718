//! Stance Test Harness - synthetic sessions without a camera
//!
//! This crate provides:
//! - Synthetic detector with scripted poses and seeded jitter
//! - Recording notification and audio collaborators
//! - Session harness and end-to-end scenarios on a paused clock

pub mod integration;
pub mod recorders;
pub mod synthetic;

pub use integration::*;
pub use recorders::*;
pub use synthetic::*;
