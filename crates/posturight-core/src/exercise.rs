//! Exercise families, automaton stages and the joints that drive them.

use serde::{Deserialize, Serialize};

use crate::angles::{bilateral_mean, AngleName, SmoothedAngleSet};

// ============================================================================
// Exercise
// ============================================================================

/// The exercise evaluated for a frame.
///
/// Names are parsed case-insensitively; anything other than the four known
/// families becomes [`Exercise::Unknown`], which the state machine treats as a
/// pass-through rather than an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Exercise {
    /// Knee-driven squat (default).
    #[default]
    Squat,
    /// Elbow-driven push-up.
    PushUp,
    /// Elbow-driven pull-up with an inverted angle direction.
    PullUp,
    /// Abdomen-driven sit-up.
    SitUp,
    /// Any unrecognised exercise name.
    Unknown,
}

impl Exercise {
    /// The four families with a rep automaton.
    pub const KNOWN: [Self; 4] = [Self::Squat, Self::PushUp, Self::PullUp, Self::SitUp];

    /// Parses an exercise name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "squat" => Self::Squat,
            "push-up" => Self::PushUp,
            "pull-up" => Self::PullUp,
            "sit-up" => Self::SitUp,
            _ => Self::Unknown,
        }
    }

    /// Canonical name, as used in reports and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Squat => "squat",
            Self::PushUp => "push-up",
            Self::PullUp => "pull-up",
            Self::SitUp => "sit-up",
            Self::Unknown => "unknown",
        }
    }

    /// Slot of this family in per-session storage; `None` for `Unknown`.
    #[must_use]
    pub const fn slot(&self) -> Option<usize> {
        match self {
            Self::Squat => Some(0),
            Self::PushUp => Some(1),
            Self::PullUp => Some(2),
            Self::SitUp => Some(3),
            Self::Unknown => None,
        }
    }

    /// Returns `true` for the four known families.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.slot().is_some()
    }

    /// Which way the driving angle moves towards the `up` stage.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        match self {
            Self::PullUp => Direction::Falling,
            _ => Direction::Rising,
        }
    }

    /// Joints whose angle drives the rep automaton.
    #[must_use]
    pub const fn driving_joint(&self) -> Option<DrivingJoint> {
        match self {
            Self::Squat => Some(DrivingJoint::Knees),
            Self::PushUp | Self::PullUp => Some(DrivingJoint::Elbows),
            Self::SitUp => Some(DrivingJoint::Abdomen),
            Self::Unknown => None,
        }
    }

    /// Angles worth showing to the user while this exercise is active.
    #[must_use]
    pub const fn display_angles(&self) -> &'static [AngleName] {
        match self {
            Self::Squat => &[AngleName::LeftKnee, AngleName::RightKnee],
            Self::PushUp | Self::PullUp => &[AngleName::LeftElbow, AngleName::RightElbow],
            Self::SitUp => &[AngleName::Abdomen],
            Self::Unknown => &[],
        }
    }
}

impl std::fmt::Display for Exercise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Exercise {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl<'de> Deserialize<'de> for Exercise {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

impl Serialize for Exercise {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Stage
// ============================================================================

/// Phase of a rep automaton.
///
/// An uninitialised automaton is represented as `Option::<Stage>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Extended / top position.
    Up,
    /// Contracted / bottom position.
    Down,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

// ============================================================================
// Direction and DrivingJoint
// ============================================================================

/// How the driving angle relates to the `up` stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// A larger angle means `up` (squat, push-up, sit-up).
    Rising,
    /// A smaller angle means `up` (pull-up).
    Falling,
}

/// Joint group whose angle drives a family's automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrivingJoint {
    /// Mean of the present elbow angles.
    Elbows,
    /// Mean of the present knee angles.
    Knees,
    /// The abdomen angle.
    Abdomen,
}

impl DrivingJoint {
    /// Reads the driving angle, or `None` when no relevant sample exists.
    #[must_use]
    pub fn read(self, angles: &SmoothedAngleSet) -> Option<f64> {
        match self {
            Self::Elbows => bilateral_mean(angles.left_elbow, angles.right_elbow),
            Self::Knees => bilateral_mean(angles.left_knee, angles.right_knee),
            Self::Abdomen => angles.abdomen,
        }
    }
}
