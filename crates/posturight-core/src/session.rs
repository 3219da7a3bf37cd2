//! A tracking session: smoother, rep automaton, mode and statistics.
//!
//! [`Session`] owns everything one user's workout needs and is fed one
//! [`FrameInput`] at a time. Sessions share nothing with each other.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::angles::{AngleSmoother, SmoothedAngleSet};
use crate::clock::Clock;
use crate::config::TrackerConfig;
use crate::exercise::{Exercise, Stage};
use crate::frame::FrameInput;
use crate::mode::{ActiveExercise, Mode};
use crate::rep_state::{RepStateMachine, SessionState};

// ============================================================================
// Outcomes and statistics
// ============================================================================

/// Everything the core reports for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameOutcome {
    /// Exercise evaluated this frame, or the waiting sentinel.
    pub active: ActiveExercise,
    /// Session rep count after this frame.
    pub counter: u32,
    /// Stage of the active family; the prior frame's stage while waiting.
    pub stage: Option<Stage>,
    /// Advisory posture verdict; always `false` while waiting.
    pub posture_ok: bool,
    /// Position between the active family's thresholds; held while waiting.
    pub progress: f64,
    /// `true` if this frame counted a rep.
    pub rep_counted: bool,
    /// Confidence the active exercise was selected with.
    pub confidence: f64,
    /// Clock reading for this frame.
    pub at: Duration,
}

/// A counted repetition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepEvent {
    /// 1-based session rep number.
    pub rep_number: u32,
    /// Family the rep was counted for.
    pub exercise: Exercise,
    /// Clock reading when the rep was counted.
    pub at: Duration,
    /// Selection confidence on that frame.
    pub confidence: f64,
    /// Posture verdict on that frame.
    pub posture_ok: bool,
}

/// Running per-session counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Evaluated frames with good posture.
    pub good_frames: u64,
    /// Evaluated frames with bad posture, including frames without data.
    pub bad_frames: u64,
    /// Frames skipped because the classifier was not confident.
    pub waiting_frames: u64,
    /// Every counted rep, in order.
    pub reps: Vec<RepEvent>,
}

impl SessionStats {
    /// Share of evaluated frames with good posture, in percent.
    ///
    /// Returns 0 when no frame has been evaluated.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let evaluated = self.good_frames + self.bad_frames;
        if evaluated == 0 {
            return 0.0;
        }
        self.good_frames as f64 / evaluated as f64 * 100.0
    }

    fn record(&mut self, outcome: &FrameOutcome) {
        match outcome.active {
            ActiveExercise::Waiting => self.waiting_frames += 1,
            ActiveExercise::Exercise(_) if outcome.posture_ok => self.good_frames += 1,
            ActiveExercise::Exercise(_) => self.bad_frames += 1,
        }
    }
}

/// End-of-session totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Exercise name in manual mode, `"auto"` in classifier mode.
    pub exercise: String,
    /// Reps counted.
    pub total_reps: u32,
    /// Clock reading at the time of the summary.
    pub duration: Duration,
    /// Frames with good posture.
    pub good_frames: u64,
    /// Frames with bad posture.
    pub bad_frames: u64,
    /// Frames spent waiting for the classifier.
    pub waiting_frames: u64,
    /// Good frames over evaluated frames, in percent.
    pub accuracy: f64,
    /// Wall-clock start of the session.
    pub started_at: DateTime<Utc>,
    /// Every counted rep.
    pub reps: Vec<RepEvent>,
}

// ============================================================================
// Session
// ============================================================================

/// One user's workout.
#[derive(Debug)]
pub struct Session<C: Clock> {
    smoother: AngleSmoother,
    machine: RepStateMachine,
    state: SessionState,
    mode: Mode,
    clock: C,
    stats: SessionStats,
    last_progress: f64,
    started_at: DateTime<Utc>,
}

impl<C: Clock> Session<C> {
    /// Starts a session with the given configuration, mode and clock.
    #[must_use]
    pub fn new(config: &TrackerConfig, mode: Mode, clock: C) -> Self {
        tracing::info!(mode = %mode, window = config.smooth_window, "Session started");
        Self {
            smoother: AngleSmoother::new(config.smooth_window),
            machine: RepStateMachine::new(config),
            state: SessionState::new(),
            mode,
            clock,
            stats: SessionStats::default(),
            last_progress: 0.0,
            started_at: Utc::now(),
        }
    }

    /// Feeds one frame through smoothing, mode selection and the automaton.
    pub fn process_frame(&mut self, input: &FrameInput) -> FrameOutcome {
        self.smoother.ingest(&input.angles);
        let smoothed = self.smoother.current();
        let at = self.clock.now();
        let (active, confidence) = self.mode.select(input.prediction.as_ref());

        let outcome = match active {
            ActiveExercise::Waiting => {
                tracing::trace!(confidence, "Waiting for a confident prediction");
                FrameOutcome {
                    active,
                    counter: self.state.counter,
                    stage: self.state.last_stage(),
                    posture_ok: false,
                    progress: self.last_progress,
                    rep_counted: false,
                    confidence,
                    at,
                }
            }
            ActiveExercise::Exercise(exercise) => {
                let step = self.machine.step(&mut self.state, exercise, &smoothed, at);
                if step.rep_counted {
                    self.stats.reps.push(RepEvent {
                        rep_number: step.counter,
                        exercise,
                        at,
                        confidence,
                        posture_ok: step.posture_ok,
                    });
                }
                self.last_progress = step.progress;
                FrameOutcome {
                    active,
                    counter: step.counter,
                    stage: step.stage,
                    posture_ok: step.posture_ok,
                    progress: step.progress,
                    rep_counted: step.rep_counted,
                    confidence,
                    at,
                }
            }
        };

        self.stats.record(&outcome);
        outcome
    }

    /// Reps counted so far.
    #[must_use]
    pub const fn counter(&self) -> u32 {
        self.state.counter
    }

    /// Current smoothed angles.
    #[must_use]
    pub const fn smoothed(&self) -> SmoothedAngleSet {
        self.smoother.current()
    }

    /// Running statistics.
    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Automaton memory of every family.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mutable automaton memory, e.g. to seed a stage.
    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// The session's operating mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Mutable access to the clock, for replaying recorded timestamps.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Totals for reporting.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let exercise = match self.mode {
            Mode::Manual { exercise } => exercise.to_string(),
            Mode::Classifier { .. } => "auto".to_string(),
        };
        let summary = SessionSummary {
            exercise,
            total_reps: self.state.counter,
            duration: self.clock.now(),
            good_frames: self.stats.good_frames,
            bad_frames: self.stats.bad_frames,
            waiting_frames: self.stats.waiting_frames,
            accuracy: self.stats.accuracy(),
            started_at: self.started_at,
            reps: self.stats.reps.clone(),
        };
        tracing::info!(
            exercise = %summary.exercise,
            reps = summary.total_reps,
            accuracy = summary.accuracy,
            "Session finished"
        );
        summary
    }
}
