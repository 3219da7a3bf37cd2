//! Advisory posture heuristics.
//!
//! The verdict is recomputed every frame and never gates rep counting.
//! When the relevant angles are missing the verdict defaults to good.

use crate::angles::{bilateral_mean, SmoothedAngleSet};
use crate::config::PostureLimits;
use crate::exercise::Exercise;

/// Judges form from the smoothed angles of the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PostureJudge {
    limits: PostureLimits,
}

impl PostureJudge {
    /// Creates a judge with the given limits.
    #[must_use]
    pub const fn new(limits: PostureLimits) -> Self {
        Self { limits }
    }

    /// Returns `true` when posture looks acceptable for `exercise`.
    #[must_use]
    pub fn is_good(&self, exercise: Exercise, angles: &SmoothedAngleSet) -> bool {
        match exercise {
            Exercise::PushUp => self.push_up(angles),
            Exercise::Squat => self.squat(angles),
            Exercise::SitUp => above(angles.abdomen, self.limits.sit_up_min_abdomen),
            Exercise::PullUp => above(angles.abdomen, self.limits.pull_up_min_abdomen),
            Exercise::Unknown => true,
        }
    }

    fn push_up(&self, angles: &SmoothedAngleSet) -> bool {
        // Without a torso reading the elbows are not judged either.
        let Some(abdomen) = angles.abdomen else {
            return true;
        };
        if abdomen < self.limits.push_up_min_abdomen {
            return false;
        }
        match (angles.left_elbow, angles.right_elbow) {
            (Some(left), Some(right)) => {
                (left - right).abs() <= self.limits.push_up_max_elbow_asymmetry
            }
            _ => true,
        }
    }

    fn squat(&self, angles: &SmoothedAngleSet) -> bool {
        bilateral_mean(angles.left_knee, angles.right_knee)
            .map_or(true, |knee| knee >= self.limits.squat_min_knee)
    }
}

fn above(angle: Option<f64>, floor: f64) -> bool {
    angle.map_or(true, |value| value >= floor)
}
