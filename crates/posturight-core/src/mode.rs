//! Operating modes: a fixed exercise or a classifier-gated one.

use serde::{Deserialize, Serialize};

use crate::exercise::Exercise;

/// One classifier output for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted exercise family.
    pub label: Exercise,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Prediction {
    /// Creates a prediction.
    #[must_use]
    pub const fn new(label: Exercise, confidence: f64) -> Self {
        Self { label, confidence }
    }
}

/// How the active exercise is chosen each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum Mode {
    /// The user picked one exercise for the whole session.
    Manual {
        /// The selected exercise.
        exercise: Exercise,
    },
    /// A classifier label is used when its confidence clears `threshold`.
    Classifier {
        /// Minimum confidence, inclusive.
        threshold: f64,
    },
}

/// The exercise evaluated for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveExercise {
    /// Run the rep automaton for this exercise.
    Exercise(Exercise),
    /// Classifier not confident enough; skip the automaton this frame.
    Waiting,
}

impl ActiveExercise {
    /// The active exercise, if any.
    #[must_use]
    pub const fn exercise(self) -> Option<Exercise> {
        match self {
            Self::Exercise(exercise) => Some(exercise),
            Self::Waiting => None,
        }
    }

    /// Returns `true` for the waiting sentinel.
    #[must_use]
    pub const fn is_waiting(self) -> bool {
        matches!(self, Self::Waiting)
    }
}

impl std::fmt::Display for ActiveExercise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exercise(exercise) => write!(f, "{exercise}"),
            Self::Waiting => write!(f, "waiting"),
        }
    }
}

impl Mode {
    /// Manual mode for `exercise`.
    #[must_use]
    pub const fn manual(exercise: Exercise) -> Self {
        Self::Manual { exercise }
    }

    /// Classifier mode gated at `threshold`.
    #[must_use]
    pub const fn classifier(threshold: f64) -> Self {
        Self::Classifier { threshold }
    }

    /// Picks the exercise for one frame, with the confidence it was chosen at.
    ///
    /// Manual mode ignores `prediction` and reports full confidence. Classifier
    /// mode is evaluated afresh every frame: a missing or low-confidence
    /// prediction yields [`ActiveExercise::Waiting`].
    #[must_use]
    pub fn select(&self, prediction: Option<&Prediction>) -> (ActiveExercise, f64) {
        match *self {
            Self::Manual { exercise } => (ActiveExercise::Exercise(exercise), 1.0),
            Self::Classifier { threshold } => match prediction {
                Some(p) if p.confidence >= threshold => {
                    (ActiveExercise::Exercise(p.label), p.confidence)
                }
                Some(p) => (ActiveExercise::Waiting, p.confidence),
                None => (ActiveExercise::Waiting, 0.0),
            },
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual { exercise } => write!(f, "manual ({exercise})"),
            Self::Classifier { threshold } => write!(f, "classifier (>= {threshold:.2})"),
        }
    }
}
