//! Stance Posture - the analysis pipeline
//!
//! One tick runs, in order:
//! 1. Confidence gate on the required landmarks
//! 2. Metric extraction (shoulder tilt, neck tilt, vertical drift)
//! 3. Classification against the sensitivity profile
//! 4. Score update
//! 5. Time accrual
//!
//! Everything here is synchronous and clock-free; the runtime supplies
//! samples, elapsed time and wall-clock timestamps.

pub mod analyzer;
pub mod calibration;
pub mod classifier;
pub mod metrics;
pub mod scoring;
pub mod stats;

pub use analyzer::*;
pub use calibration::*;
pub use classifier::*;
pub use metrics::*;
pub use scoring::*;
pub use stats::*;
