//! Rep-counting state machine.
//!
//! All four families share one two-stage hysteresis automaton parameterised
//! by their thresholds and direction. The mutable parts (counter, stage and
//! last counted rep per family) live in a [`SessionState`] record owned by the
//! caller, so independent sessions never share anything.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::angles::SmoothedAngleSet;
use crate::config::{ThresholdTable, Thresholds, TrackerConfig};
use crate::exercise::{Direction, Exercise, Stage};
use crate::posture::PostureJudge;
use crate::progress::progress_fraction;

// ============================================================================
// ExerciseState and SessionState
// ============================================================================

/// Automaton memory for one exercise family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseState {
    /// Current stage; `None` until the first valid sample.
    pub stage: Option<Stage>,

    /// Clock reading of the last counted rep of this family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_rep_at: Option<Duration>,
}

/// Mutable per-session record: the rep counter plus one [`ExerciseState`]
/// per known family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Reps counted in this session. Never decremented.
    pub counter: u32,

    exercises: [ExerciseState; 4],

    /// Stage reported by the most recent step of a known family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_stage: Option<Stage>,
}

impl SessionState {
    /// Creates a fresh record with every family uninitialised.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Automaton memory for `exercise`; `None` for `Unknown`.
    #[must_use]
    pub fn exercise(&self, exercise: Exercise) -> Option<&ExerciseState> {
        exercise.slot().map(|slot| &self.exercises[slot])
    }

    /// Mutable automaton memory for `exercise`; `None` for `Unknown`.
    pub fn exercise_mut(&mut self, exercise: Exercise) -> Option<&mut ExerciseState> {
        exercise.slot().map(|slot| &mut self.exercises[slot])
    }

    /// Current stage of `exercise`.
    #[must_use]
    pub fn stage(&self, exercise: Exercise) -> Option<Stage> {
        self.exercise(exercise).and_then(|state| state.stage)
    }

    /// Overrides the stage of `exercise`. No-op for `Unknown`.
    pub fn set_stage(&mut self, exercise: Exercise, stage: Option<Stage>) {
        if let Some(state) = self.exercise_mut(exercise) {
            state.stage = stage;
            self.last_stage = stage;
        }
    }

    /// Stage reported on the last step of a known family. Frames that skip
    /// the automaton carry this stage forward.
    #[must_use]
    pub const fn last_stage(&self) -> Option<Stage> {
        self.last_stage
    }
}

// ============================================================================
// StepOutcome
// ============================================================================

/// Result of one [`RepStateMachine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Session rep count after the step.
    pub counter: u32,

    /// Family stage after the step.
    pub stage: Option<Stage>,

    /// Advisory posture verdict.
    pub posture_ok: bool,

    /// Position between the family's thresholds, in `[0, 1]`.
    pub progress: f64,

    /// `true` if this step incremented the counter.
    pub rep_counted: bool,
}

impl StepOutcome {
    const fn unchanged(counter: u32, stage: Option<Stage>, posture_ok: bool) -> Self {
        Self {
            counter,
            stage,
            posture_ok,
            progress: 0.0,
            rep_counted: false,
        }
    }
}

// ============================================================================
// RepStateMachine
// ============================================================================

/// Threshold hysteresis counter shared by every exercise family.
#[derive(Debug, Clone, PartialEq)]
pub struct RepStateMachine {
    thresholds: ThresholdTable,
    posture: PostureJudge,
    min_rep_interval: Duration,
}

impl Default for RepStateMachine {
    fn default() -> Self {
        Self::new(&TrackerConfig::default())
    }
}

impl RepStateMachine {
    /// Builds a machine from the thresholds, posture limits and debounce
    /// interval of `config`.
    #[must_use]
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            thresholds: config.thresholds,
            posture: PostureJudge::new(config.posture),
            min_rep_interval: config.min_rep_interval(),
        }
    }

    /// The debounce floor between two counted reps of one family.
    #[must_use]
    pub const fn min_rep_interval(&self) -> Duration {
        self.min_rep_interval
    }

    /// Advances the automaton of `exercise` by one frame.
    ///
    /// Reads `(counter, stage)` from `state`, writes the updated values back
    /// and returns them along with the posture verdict and progress.
    ///
    /// - `Unknown` exercise: nothing changes, the last reported stage is
    ///   passed through, posture is good, progress 0.
    /// - No driving angle: nothing changes, posture is bad, progress 0.
    /// - Otherwise the stage is resolved (on first sample), the hysteresis
    ///   transition applied, and a completed `down -> up` cycle counts a rep
    ///   if at least the debounce interval has passed since the family's last
    ///   counted rep. A debounced transition still flips the stage.
    pub fn step(
        &self,
        state: &mut SessionState,
        exercise: Exercise,
        angles: &SmoothedAngleSet,
        now: Duration,
    ) -> StepOutcome {
        let counter = state.counter;
        let Some(slot) = exercise.slot() else {
            return StepOutcome::unchanged(counter, state.last_stage, true);
        };
        let family = &mut state.exercises[slot];

        let Some(angle) = exercise
            .driving_joint()
            .and_then(|joint| joint.read(angles))
        else {
            tracing::trace!(exercise = %exercise, "No driving angle, step skipped");
            let stage = family.stage;
            state.last_stage = stage;
            return StepOutcome::unchanged(counter, stage, false);
        };

        let thresholds = self.thresholds.for_exercise(exercise);
        let direction = exercise.direction();

        let current = family.stage.unwrap_or_else(|| {
            let resolved = initial_stage(angle, thresholds, direction);
            tracing::debug!(exercise = %exercise, angle, stage = %resolved, "Stage initialised");
            resolved
        });
        let (next, completes_rep) = transition(current, angle, thresholds, direction);

        let mut rep_counted = false;
        if completes_rep {
            let allowed = family
                .last_rep_at
                .map_or(true, |last| now.saturating_sub(last) >= self.min_rep_interval);
            if allowed {
                state.counter = state.counter.saturating_add(1);
                family.last_rep_at = Some(now);
                rep_counted = true;
                tracing::debug!(
                    exercise = %exercise,
                    counter = state.counter,
                    angle,
                    "Rep counted"
                );
            } else {
                tracing::debug!(
                    exercise = %exercise,
                    angle,
                    since_last = ?family.last_rep_at.map(|last| now.saturating_sub(last)),
                    "Rep debounced"
                );
            }
        }

        if next != current {
            tracing::debug!(exercise = %exercise, from = %current, to = %next, angle, "Stage transition");
        }
        family.stage = Some(next);
        state.last_stage = Some(next);

        StepOutcome {
            counter: state.counter,
            stage: Some(next),
            posture_ok: self.posture.is_good(exercise, angles),
            progress: progress_fraction(angle, thresholds, direction),
            rep_counted,
        }
    }
}

/// Stage assumed for the first valid sample of a family.
fn initial_stage(angle: f64, thresholds: Thresholds, direction: Direction) -> Stage {
    match direction {
        Direction::Rising if angle > thresholds.up => Stage::Up,
        Direction::Falling if angle > thresholds.down => Stage::Down,
        Direction::Rising => Stage::Down,
        Direction::Falling => Stage::Up,
    }
}

/// Applies the hysteresis rule; the flag is set when a rep cycle completes.
fn transition(
    stage: Stage,
    angle: f64,
    thresholds: Thresholds,
    direction: Direction,
) -> (Stage, bool) {
    match (direction, stage) {
        (Direction::Rising, Stage::Up) if angle < thresholds.down => (Stage::Down, false),
        (Direction::Rising, Stage::Down) if angle > thresholds.up => (Stage::Up, true),
        (Direction::Falling, Stage::Down) if angle < thresholds.up => (Stage::Up, true),
        (Direction::Falling, Stage::Up) if angle > thresholds.down => (Stage::Down, false),
        _ => (stage, false),
    }
}
