//! Synthetic detector - scripted poses instead of a camera and model
//!
//! Poses share one geometry: ears 60px apart at y=140, nose 40px to the
//! side of the ear midpoint, shoulders 200px apart at y=260. Each builder
//! perturbs exactly one metric.

use std::collections::VecDeque;
use std::pin::pin;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stance_core::{Landmark, LandmarkPoint, LandmarkSample, StanceError, StanceResult};
use stance_runtime::Detector;
use tokio::sync::Notify;

const EAR_Y: f32 = 140.0;
const EAR_MID_X: f32 = 330.0;
const SHOULDER_Y: f32 = 260.0;
const SHOULDER_LEFT_X: f32 = 230.0;
const SHOULDER_SPAN: f32 = 200.0;
const NOSE_OFFSET: f32 = 40.0;
const CONFIDENT: f32 = 0.9;

/// Reference pose: level shoulders, ~4.3 degree neck tilt, no drift
pub fn upright() -> LandmarkSample {
    pose(0.0, 0.0, neck_angle_of_upright())
}

/// Shoulders tilted by `degrees`, mean shoulder height unchanged
pub fn uneven_shoulders(degrees: f32) -> LandmarkSample {
    let dy = SHOULDER_SPAN * degrees.to_radians().tan();
    pose(dy, 0.0, neck_angle_of_upright())
}

/// Nose rotated `degrees` around the ear midpoint
pub fn head_tilted(degrees: f32) -> LandmarkSample {
    pose(0.0, 0.0, degrees)
}

/// Shoulders lowered by `drift_px`, which is exactly the vertical drift
/// measured against an `upright` baseline
pub fn slouched(drift_px: f32) -> LandmarkSample {
    pose(0.0, drift_px, neck_angle_of_upright())
}

/// `upright` with one landmark's confidence at `confidence`
pub fn weak(landmark: Landmark, confidence: f32) -> LandmarkSample {
    let mut sample = upright();
    if let Some(point) = sample.get(landmark).copied() {
        sample.insert(landmark, LandmarkPoint { confidence, ..point });
    }
    sample
}

fn neck_angle_of_upright() -> f32 {
    (3.0f32).atan2(NOSE_OFFSET).to_degrees()
}

fn pose(shoulder_dy: f32, shoulder_drop: f32, neck_deg: f32) -> LandmarkSample {
    let neck = neck_deg.to_radians();
    let nose_radius = (NOSE_OFFSET * NOSE_OFFSET + 9.0).sqrt();

    LandmarkSample::new()
        .with(Landmark::LeftEye, LandmarkPoint::new(318.0, 128.0, CONFIDENT))
        .with(Landmark::RightEye, LandmarkPoint::new(342.0, 128.0, CONFIDENT))
        .with(Landmark::LeftEar, LandmarkPoint::new(EAR_MID_X - 30.0, EAR_Y, CONFIDENT))
        .with(Landmark::RightEar, LandmarkPoint::new(EAR_MID_X + 30.0, EAR_Y, CONFIDENT))
        .with(
            Landmark::Nose,
            LandmarkPoint::new(
                EAR_MID_X + nose_radius * neck.cos(),
                EAR_Y + nose_radius * neck.sin(),
                CONFIDENT,
            ),
        )
        .with(
            Landmark::LeftShoulder,
            LandmarkPoint::new(
                SHOULDER_LEFT_X,
                SHOULDER_Y + shoulder_drop - shoulder_dy / 2.0,
                CONFIDENT,
            ),
        )
        .with(
            Landmark::RightShoulder,
            LandmarkPoint::new(
                SHOULDER_LEFT_X + SHOULDER_SPAN,
                SHOULDER_Y + shoulder_drop + shoulder_dy / 2.0,
                CONFIDENT,
            ),
        )
}

/// One scripted detector answer
#[derive(Clone, Debug, PartialEq)]
pub enum DetectorResponse {
    Pose(LandmarkSample),
    NoPose,
    Failure,
}

impl DetectorResponse {
    fn into_result(self) -> StanceResult<Option<LandmarkSample>> {
        match self {
            DetectorResponse::Pose(sample) => Ok(Some(sample)),
            DetectorResponse::NoPose => Ok(None),
            DetectorResponse::Failure => Err(StanceError::DetectionUnavailable(
                "synthetic detector failure".to_string(),
            )),
        }
    }
}

/// Detector that replays a script, then repeats a fallback answer
pub struct SyntheticDetector {
    script: Mutex<VecDeque<DetectorResponse>>,
    fallback: Mutex<DetectorResponse>,
    /// Max positional noise in pixels
    jitter_px: f32,
    rng: Mutex<StdRng>,
    requests: AtomicU64,
    /// While set, requests wait for `release`
    held: AtomicBool,
    gate: Notify,
    /// Requests currently parked at the gate
    waiting: AtomicUsize,
}

impl SyntheticDetector {
    pub fn new(fallback: DetectorResponse) -> Self {
        SyntheticDetector {
            script: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(fallback),
            jitter_px: 0.0,
            rng: Mutex::new(StdRng::seed_from_u64(0)),
            requests: AtomicU64::new(0),
            held: AtomicBool::new(false),
            gate: Notify::new(),
            waiting: AtomicUsize::new(0),
        }
    }

    /// Always answers with `sample`
    pub fn steady(sample: LandmarkSample) -> Self {
        Self::new(DetectorResponse::Pose(sample))
    }

    /// Add up to `jitter_px` of uniform noise to every coordinate
    pub fn with_jitter(mut self, jitter_px: f32, seed: u64) -> Self {
        self.jitter_px = jitter_px.abs();
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Queue one answer ahead of the fallback
    pub fn push(&self, response: DetectorResponse) {
        self.script.lock().push_back(response);
    }

    pub fn push_n(&self, response: DetectorResponse, count: usize) {
        let mut script = self.script.lock();
        for _ in 0..count {
            script.push_back(response.clone());
        }
    }

    pub fn set_fallback(&self, response: DetectorResponse) {
        *self.fallback.lock() = response;
    }

    /// Scripted answers not yet consumed
    pub fn pending(&self) -> usize {
        self.script.lock().len()
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Park every following request until `release`, like a slow model
    pub fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    /// Let parked requests answer
    pub fn release(&self) {
        self.held.store(false, Ordering::SeqCst);
        self.gate.notify_waiters();
    }

    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    async fn pass_gate(&self) {
        if !self.held.load(Ordering::SeqCst) {
            return;
        }
        let _parked = Parked::enter(&self.waiting);
        loop {
            let mut notified = pin!(self.gate.notified());
            notified.as_mut().enable();
            if !self.held.load(Ordering::SeqCst) {
                break;
            }
            notified.await;
        }
    }

    fn next_response(&self) -> DetectorResponse {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let scripted = self.script.lock().pop_front();
        let response = scripted.unwrap_or_else(|| self.fallback.lock().clone());

        match response {
            DetectorResponse::Pose(sample) if self.jitter_px > 0.0 => {
                DetectorResponse::Pose(self.jittered(sample))
            }
            other => other,
        }
    }

    fn jittered(&self, sample: LandmarkSample) -> LandmarkSample {
        let mut rng = self.rng.lock();
        let mut noisy = LandmarkSample::new();
        for (landmark, point) in sample.iter() {
            let dx = rng.gen_range(-self.jitter_px..=self.jitter_px);
            let dy = rng.gen_range(-self.jitter_px..=self.jitter_px);
            noisy.insert(
                landmark,
                LandmarkPoint::new(point.x + dx, point.y + dy, point.confidence),
            );
        }
        noisy
    }
}

/// Counts a parked request; also released when the request is cancelled
struct Parked<'a>(&'a AtomicUsize);

impl<'a> Parked<'a> {
    fn enter(waiting: &'a AtomicUsize) -> Self {
        waiting.fetch_add(1, Ordering::SeqCst);
        Parked(waiting)
    }
}

impl Drop for Parked<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Detector for SyntheticDetector {
    async fn request_sample(&self) -> StanceResult<Option<LandmarkSample>> {
        self.pass_gate().await;
        self.next_response().into_result()
    }
}
