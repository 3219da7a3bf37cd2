//! Joint-angle sets and the moving-average smoother.
//!
//! Angles arrive once per frame from the geometry collaborator as degrees or
//! absent. [`AngleSmoother`] keeps a short sliding window per joint and
//! exposes the current mean of each window.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of samples averaged per joint.
pub const DEFAULT_SMOOTH_WINDOW: usize = 3;

// ============================================================================
// AngleName
// ============================================================================

/// The anatomical angles tracked by the smoother.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleName {
    /// Shoulder-elbow-wrist, left side.
    LeftElbow,
    /// Shoulder-elbow-wrist, right side.
    RightElbow,
    /// Hip-knee-ankle, left side.
    LeftKnee,
    /// Hip-knee-ankle, right side.
    RightKnee,
    /// Shoulder-hip-knee, averaged over both sides.
    Abdomen,
    /// Ear-shoulder-hip.
    Neck,
}

impl AngleName {
    /// Every tracked angle, in storage order.
    pub const ALL: [Self; 6] = [
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftKnee,
        Self::RightKnee,
        Self::Abdomen,
        Self::Neck,
    ];

    const fn index(self) -> usize {
        match self {
            Self::LeftElbow => 0,
            Self::RightElbow => 1,
            Self::LeftKnee => 2,
            Self::RightKnee => 3,
            Self::Abdomen => 4,
            Self::Neck => 5,
        }
    }

    /// Short label used in terminal output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LeftElbow => "Elbow L",
            Self::RightElbow => "Elbow R",
            Self::LeftKnee => "Knee L",
            Self::RightKnee => "Knee R",
            Self::Abdomen => "Torso",
            Self::Neck => "Neck",
        }
    }
}

impl std::fmt::Display for AngleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::Abdomen => "abdomen",
            Self::Neck => "neck",
        };
        write!(f, "{s}")
    }
}

// ============================================================================
// JointAngles
// ============================================================================

/// One value per tracked angle, in degrees, or `None` when absent.
///
/// Used both for the raw per-frame samples and for the smoothed output.
/// Absence is never encoded as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JointAngles {
    /// Left elbow angle.
    pub left_elbow: Option<f64>,
    /// Right elbow angle.
    pub right_elbow: Option<f64>,
    /// Left knee angle.
    pub left_knee: Option<f64>,
    /// Right knee angle.
    pub right_knee: Option<f64>,
    /// Torso (abdomen) angle.
    pub abdomen: Option<f64>,
    /// Neck angle.
    pub neck: Option<f64>,
}

/// Raw samples for one frame.
pub type RawAngles = JointAngles;

/// Moving averages for the current frame.
pub type SmoothedAngleSet = JointAngles;

impl JointAngles {
    /// Creates a set with every angle absent.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            left_elbow: None,
            right_elbow: None,
            left_knee: None,
            right_knee: None,
            abdomen: None,
            neck: None,
        }
    }

    /// Returns the value for `name`.
    #[must_use]
    pub const fn get(&self, name: AngleName) -> Option<f64> {
        match name {
            AngleName::LeftElbow => self.left_elbow,
            AngleName::RightElbow => self.right_elbow,
            AngleName::LeftKnee => self.left_knee,
            AngleName::RightKnee => self.right_knee,
            AngleName::Abdomen => self.abdomen,
            AngleName::Neck => self.neck,
        }
    }

    /// Sets the value for `name`.
    pub fn set(&mut self, name: AngleName, value: Option<f64>) {
        let slot = match name {
            AngleName::LeftElbow => &mut self.left_elbow,
            AngleName::RightElbow => &mut self.right_elbow,
            AngleName::LeftKnee => &mut self.left_knee,
            AngleName::RightKnee => &mut self.right_knee,
            AngleName::Abdomen => &mut self.abdomen,
            AngleName::Neck => &mut self.neck,
        };
        *slot = value;
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, name: AngleName, degrees: f64) -> Self {
        self.set(name, Some(degrees));
        self
    }

    /// Returns `true` if no angle is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        AngleName::ALL.iter().all(|name| self.get(*name).is_none())
    }
}

/// Mean of whichever sides of a left/right pair are present.
#[must_use]
pub fn bilateral_mean(left: Option<f64>, right: Option<f64>) -> Option<f64> {
    match (left, right) {
        (Some(l), Some(r)) => Some((l + r) / 2.0),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

// ============================================================================
// AngleSmoother
// ============================================================================

/// Sliding-window moving average per tracked angle.
///
/// Each window holds at most `window` samples; the oldest sample is evicted
/// first. Frames where an angle is absent leave its window untouched.
#[derive(Debug, Clone)]
pub struct AngleSmoother {
    window: usize,
    buffers: [VecDeque<f64>; 6],
    current: SmoothedAngleSet,
}

impl Default for AngleSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTH_WINDOW)
    }
}

impl AngleSmoother {
    /// Creates a smoother averaging the last `window` samples per angle.
    ///
    /// A window of zero is treated as one.
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            buffers: std::array::from_fn(|_| VecDeque::with_capacity(window)),
            current: SmoothedAngleSet::empty(),
        }
    }

    /// Returns the configured window length.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Appends the present samples of one frame and recomputes the averages.
    ///
    /// Non-finite samples are dropped like absent ones.
    pub fn ingest(&mut self, raw: &RawAngles) {
        for name in AngleName::ALL {
            let Some(sample) = raw.get(name).filter(|v| v.is_finite()) else {
                continue;
            };
            let buffer = &mut self.buffers[name.index()];
            if buffer.len() == self.window {
                buffer.pop_front();
            }
            buffer.push_back(sample);
        }

        for name in AngleName::ALL {
            let buffer = &self.buffers[name.index()];
            let mean = if buffer.is_empty() {
                None
            } else {
                Some(buffer.iter().sum::<f64>() / buffer.len() as f64)
            };
            self.current.set(name, mean);
        }

        tracing::trace!(smoothed = ?self.current, "Angles smoothed");
    }

    /// Returns the current moving averages.
    #[must_use]
    pub const fn current(&self) -> SmoothedAngleSet {
        self.current
    }

    /// Number of samples currently buffered for `name`.
    #[must_use]
    pub fn buffered(&self, name: AngleName) -> usize {
        self.buffers[name.index()].len()
    }

    /// Discards every buffered sample.
    pub fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.clear();
        }
        self.current = SmoothedAngleSet::empty();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.unwrap();
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_smoother_reports_absent() {
        let smoother = AngleSmoother::default();
        assert!(smoother.current().is_empty());
    }

    #[test]
    fn test_moving_average_window_of_three() {
        let mut smoother = AngleSmoother::new(3);
        for (sample, expected) in [(10.0, 10.0), (20.0, 15.0), (30.0, 20.0), (40.0, 30.0)] {
            smoother.ingest(&RawAngles::empty().with(AngleName::Abdomen, sample));
            approx(smoother.current().abdomen, expected);
        }
        assert_eq!(smoother.buffered(AngleName::Abdomen), 3);
    }

    #[test]
    fn test_absent_samples_not_appended() {
        let mut smoother = AngleSmoother::new(3);
        smoother.ingest(&RawAngles::empty().with(AngleName::LeftKnee, 120.0));
        smoother.ingest(&RawAngles::empty());
        smoother.ingest(&RawAngles::empty());

        assert_eq!(smoother.buffered(AngleName::LeftKnee), 1);
        approx(smoother.current().left_knee, 120.0);
        assert!(smoother.current().right_knee.is_none());
    }

    #[test]
    fn test_non_finite_samples_dropped() {
        let mut smoother = AngleSmoother::new(3);
        smoother.ingest(&RawAngles::empty().with(AngleName::Neck, 150.0));
        smoother.ingest(&RawAngles::empty().with(AngleName::Neck, f64::NAN));
        approx(smoother.current().neck, 150.0);
    }

    #[test]
    fn test_each_angle_has_independent_window() {
        let mut smoother = AngleSmoother::new(2);
        smoother.ingest(
            &RawAngles::empty()
                .with(AngleName::LeftElbow, 90.0)
                .with(AngleName::RightElbow, 100.0),
        );
        smoother.ingest(&RawAngles::empty().with(AngleName::LeftElbow, 110.0));

        approx(smoother.current().left_elbow, 100.0);
        approx(smoother.current().right_elbow, 100.0);
    }

    #[test]
    fn test_zero_window_behaves_as_one() {
        let mut smoother = AngleSmoother::new(0);
        assert_eq!(smoother.window(), 1);
        smoother.ingest(&RawAngles::empty().with(AngleName::Abdomen, 10.0));
        smoother.ingest(&RawAngles::empty().with(AngleName::Abdomen, 50.0));
        approx(smoother.current().abdomen, 50.0);
    }

    #[test]
    fn test_reset_clears_buffers() {
        let mut smoother = AngleSmoother::default();
        smoother.ingest(&RawAngles::empty().with(AngleName::Abdomen, 10.0));
        smoother.reset();
        assert!(smoother.current().is_empty());
        assert_eq!(smoother.buffered(AngleName::Abdomen), 0);
    }

    #[test]
    fn test_bilateral_mean() {
        assert_eq!(bilateral_mean(Some(100.0), Some(140.0)), Some(120.0));
        assert_eq!(bilateral_mean(Some(100.0), None), Some(100.0));
        assert_eq!(bilateral_mean(None, Some(140.0)), Some(140.0));
        assert_eq!(bilateral_mean(None, None), None);
    }

    #[test]
    fn test_joint_angles_deserialization() {
        let json = r#"{"left_knee": 160.0, "right_knee": null}"#;
        let angles: JointAngles = serde_json::from_str(json).unwrap();
        assert_eq!(angles.left_knee, Some(160.0));
        assert!(angles.right_knee.is_none());
        assert!(angles.abdomen.is_none());
    }

    #[test]
    fn test_joint_angles_rejects_unknown_keys() {
        let json = r#"{"left_ankle": 90.0}"#;
        let result: std::result::Result<JointAngles, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_angle_name_display() {
        assert_eq!(AngleName::LeftElbow.to_string(), "left_elbow");
        assert_eq!(AngleName::Abdomen.to_string(), "abdomen");
    }
}
