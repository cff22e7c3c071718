//! Landmarks - named 2D body points as reported by the pose detector
//!
//! A sample is ephemeral: the detector produces a fresh one every tick and
//! nothing downstream mutates it.

/// Body landmark identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Landmark {
    // Head
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,

    // Arms
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,

    // Legs
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Landmark {
    /// All landmarks in detector order
    pub fn all() -> &'static [Landmark] {
        &[
            Landmark::Nose,
            Landmark::LeftEye,
            Landmark::RightEye,
            Landmark::LeftEar,
            Landmark::RightEar,
            Landmark::LeftShoulder,
            Landmark::RightShoulder,
            Landmark::LeftElbow,
            Landmark::RightElbow,
            Landmark::LeftWrist,
            Landmark::RightWrist,
            Landmark::LeftHip,
            Landmark::RightHip,
            Landmark::LeftKnee,
            Landmark::RightKnee,
            Landmark::LeftAnkle,
            Landmark::RightAnkle,
        ]
    }

    /// Number of landmarks
    pub const fn count() -> usize {
        17
    }

    /// Part name used by the detector (camelCase)
    pub fn part_name(self) -> &'static str {
        match self {
            Landmark::Nose => "nose",
            Landmark::LeftEye => "leftEye",
            Landmark::RightEye => "rightEye",
            Landmark::LeftEar => "leftEar",
            Landmark::RightEar => "rightEar",
            Landmark::LeftShoulder => "leftShoulder",
            Landmark::RightShoulder => "rightShoulder",
            Landmark::LeftElbow => "leftElbow",
            Landmark::RightElbow => "rightElbow",
            Landmark::LeftWrist => "leftWrist",
            Landmark::RightWrist => "rightWrist",
            Landmark::LeftHip => "leftHip",
            Landmark::RightHip => "rightHip",
            Landmark::LeftKnee => "leftKnee",
            Landmark::RightKnee => "rightKnee",
            Landmark::LeftAnkle => "leftAnkle",
            Landmark::RightAnkle => "rightAnkle",
        }
    }

    /// Look up a landmark by its detector part name
    pub fn from_part_name(name: &str) -> Option<Landmark> {
        Landmark::all()
            .iter()
            .copied()
            .find(|landmark| landmark.part_name() == name)
    }
}

impl std::fmt::Display for Landmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.part_name())
    }
}

/// Landmarks that must be confidently detected for calibration and analysis
pub const REQUIRED_LANDMARKS: [Landmark; 5] = [
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftEar,
    Landmark::RightEar,
    Landmark::Nose,
];

/// Minimum confidence (exclusive) for a required landmark to count as detected
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// 2D position in image pixels plus detection confidence in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// Arithmetic mean of two positions. Confidence is the weaker of the two.
    pub fn midpoint(&self, other: &LandmarkPoint) -> LandmarkPoint {
        LandmarkPoint {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            confidence: self.confidence.min(other.confidence),
        }
    }

    /// Strictly above the threshold
    #[inline]
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence > threshold
    }
}

/// One detector output: landmark -> point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSample {
    points: [Option<LandmarkPoint>; Landmark::count()],
}

impl LandmarkSample {
    /// Empty sample (no landmarks detected)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sample from detector `(part name, point)` pairs.
    /// Unknown part names are ignored; a repeated name keeps the last value.
    pub fn from_parts<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, LandmarkPoint)>,
    {
        let mut sample = Self::new();
        for (name, point) in parts {
            if let Some(landmark) = Landmark::from_part_name(name) {
                sample.insert(landmark, point);
            }
        }
        sample
    }

    /// Builder-style insert
    pub fn with(mut self, landmark: Landmark, point: LandmarkPoint) -> Self {
        self.insert(landmark, point);
        self
    }

    pub fn insert(&mut self, landmark: Landmark, point: LandmarkPoint) {
        self.points[landmark as usize] = Some(point);
    }

    pub fn get(&self, landmark: Landmark) -> Option<&LandmarkPoint> {
        self.points[landmark as usize].as_ref()
    }

    /// Point only if detected above `threshold`
    pub fn confident(&self, landmark: Landmark, threshold: f32) -> Option<&LandmarkPoint> {
        self.get(landmark).filter(|p| p.is_confident(threshold))
    }

    /// Required landmarks that are absent or not above `threshold`
    pub fn missing_required(&self, threshold: f32) -> Vec<Landmark> {
        REQUIRED_LANDMARKS
            .iter()
            .copied()
            .filter(|landmark| self.confident(*landmark, threshold).is_none())
            .collect()
    }

    /// True when every required landmark is above `threshold`
    pub fn has_required(&self, threshold: f32) -> bool {
        self.missing_required(threshold).is_empty()
    }

    /// Number of detected landmarks, regardless of confidence
    pub fn len(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over detected landmarks
    pub fn iter(&self) -> impl Iterator<Item = (Landmark, &LandmarkPoint)> {
        Landmark::all()
            .iter()
            .zip(self.points.iter())
            .filter_map(|(landmark, point)| point.as_ref().map(|p| (*landmark, p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_sample(confidence: f32) -> LandmarkSample {
        Landmark::all()
            .iter()
            .fold(LandmarkSample::new(), |sample, landmark| {
                sample.with(*landmark, LandmarkPoint::new(1.0, 2.0, confidence))
            })
    }

    #[test]
    fn test_part_name_roundtrip() {
        for landmark in Landmark::all() {
            assert_eq!(Landmark::from_part_name(landmark.part_name()), Some(*landmark));
        }
        assert_eq!(Landmark::all().len(), Landmark::count());
        assert_eq!(Landmark::from_part_name("tail"), None);
    }

    #[test]
    fn test_from_parts_ignores_unknown() {
        let sample = LandmarkSample::from_parts([
            ("nose", LandmarkPoint::new(10.0, 20.0, 0.9)),
            ("tail", LandmarkPoint::new(0.0, 0.0, 1.0)),
            ("nose", LandmarkPoint::new(11.0, 21.0, 0.8)),
        ]);

        assert_eq!(sample.len(), 1);
        let nose = sample.get(Landmark::Nose).unwrap();
        assert_eq!(nose.x, 11.0);
        assert_eq!(nose.confidence, 0.8);
    }

    #[test]
    fn test_midpoint() {
        let a = LandmarkPoint::new(0.0, 10.0, 0.9);
        let b = LandmarkPoint::new(10.0, 20.0, 0.6);

        let mid = a.midpoint(&b);
        assert_eq!(mid.x, 5.0);
        assert_eq!(mid.y, 15.0);
        assert_eq!(mid.confidence, 0.6);
    }

    #[test]
    fn test_required_threshold_is_strict() {
        assert!(full_sample(0.51).has_required(CONFIDENCE_THRESHOLD));
        assert_eq!(
            full_sample(0.5).missing_required(CONFIDENCE_THRESHOLD),
            REQUIRED_LANDMARKS.to_vec()
        );
    }

    #[test]
    fn test_missing_required_lists_absent() {
        let sample = full_sample(0.9);
        let mut partial = LandmarkSample::new();
        for (landmark, point) in sample.iter() {
            if landmark != Landmark::LeftEar {
                partial.insert(landmark, *point);
            }
        }

        assert_eq!(
            partial.missing_required(CONFIDENCE_THRESHOLD),
            vec![Landmark::LeftEar]
        );
        assert_eq!(partial.len(), Landmark::count() - 1);
    }
}
