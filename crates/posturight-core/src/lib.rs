//! PostuRight tracker core
//!
//! Per-frame exercise state machine: joint-angle smoothing, rep detection with
//! hysteresis and debounce, advisory posture checks and progress, across four
//! exercise families and two operating modes.

pub mod angles;
pub mod clock;
pub mod config;
pub mod error;
pub mod exercise;
pub mod frame;
pub mod mode;
pub mod posture;
pub mod progress;
pub mod rep_state;
pub mod session;

pub use angles::{
    bilateral_mean, AngleName, AngleSmoother, JointAngles, RawAngles, SmoothedAngleSet,
    DEFAULT_SMOOTH_WINDOW,
};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{PostureLimits, ThresholdTable, Thresholds, TrackerConfig};
pub use error::{Result, TrackerError};
pub use exercise::{Direction, DrivingJoint, Exercise, Stage};
pub use frame::{parse_trace, read_trace, FrameInput, FrameRecord};
pub use mode::{ActiveExercise, Mode, Prediction};
pub use posture::PostureJudge;
pub use progress::progress_fraction;
pub use rep_state::{ExerciseState, RepStateMachine, SessionState, StepOutcome};
pub use session::{FrameOutcome, RepEvent, Session, SessionStats, SessionSummary};
