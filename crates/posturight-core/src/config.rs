//! Configuration for the PostuRight tracker.
//!
//! Every tunable of the per-frame core lives here: the smoothing window, the
//! rep debounce interval, the classifier confidence gate, per-family angle
//! thresholds and the posture limits.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::angles::DEFAULT_SMOOTH_WINDOW;
use crate::error::{Result, TrackerError};
use crate::exercise::{Direction, Exercise};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "posturight.json";

const fn default_smooth_window() -> usize {
    DEFAULT_SMOOTH_WINDOW
}

/// Minimum wall-clock gap between two counted reps of one family.
const fn default_min_rep_interval_secs() -> f64 {
    0.15
}

/// Classifier confidence needed to activate a predicted exercise.
const fn default_confidence_threshold() -> f64 {
    0.75
}

fn default_output_dir() -> String {
    "reports".to_string()
}

/// Main tracker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
    /// Number of samples averaged per joint angle.
    #[serde(default = "default_smooth_window")]
    pub smooth_window: usize,

    /// Debounce floor between counted reps of the same family, in seconds.
    #[serde(default = "default_min_rep_interval_secs")]
    pub min_rep_interval_secs: f64,

    /// Confidence at or above which a classifier label becomes active.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Per-family hysteresis thresholds.
    #[serde(default)]
    pub thresholds: ThresholdTable,

    /// Posture heuristic limits.
    #[serde(default)]
    pub posture: PostureLimits,

    /// Directory for reports and CSV logs.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            smooth_window: default_smooth_window(),
            min_rep_interval_secs: default_min_rep_interval_secs(),
            confidence_threshold: default_confidence_threshold(),
            thresholds: ThresholdTable::default(),
            posture: PostureLimits::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl TrackerConfig {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `posturight.json`; falls back to defaults when absent.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            TrackerError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads `posturight.json` from a specific directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file yields the default configuration. The parsed
    /// configuration is validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::ConfigParseError` for unreadable files or bad
    /// JSON, and `TrackerError::ConfigValidationError` for out-of-range values.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(TrackerError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| TrackerError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.smooth_window == 0 {
            return Err(TrackerError::config_validation(
                "smoothWindow must be greater than 0",
                "Set smoothWindow to at least 1 in your posturight.json",
            ));
        }

        if Duration::try_from_secs_f64(self.min_rep_interval_secs).is_err() {
            return Err(TrackerError::config_validation(
                "minRepIntervalSecs must be a non-negative number of seconds within duration range",
                "Set minRepIntervalSecs to 0.15 or another small positive value in your posturight.json",
            ));
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(TrackerError::config_validation(
                "confidenceThreshold must be between 0 and 1",
                "Set confidenceThreshold to a probability such as 0.75 in your posturight.json",
            ));
        }

        for exercise in Exercise::KNOWN {
            self.thresholds.for_exercise(exercise).validate(exercise)?;
        }

        self.posture.validate()?;

        if self.output_dir.trim().is_empty() {
            return Err(TrackerError::config_validation(
                "outputDir must not be empty",
                "Provide a valid output directory path in your posturight.json",
            ));
        }

        Ok(())
    }

    /// The debounce interval as a `Duration`.
    ///
    /// [`validate`](Self::validate) rejects values that do not fit. On an
    /// unvalidated config, oversized intervals saturate to `Duration::MAX` and
    /// negative or NaN values become zero.
    #[must_use]
    pub fn min_rep_interval(&self) -> Duration {
        let secs = self.min_rep_interval_secs;
        Duration::try_from_secs_f64(secs).unwrap_or(if secs > 0.0 {
            Duration::MAX
        } else {
            Duration::ZERO
        })
    }
}

// ============================================================================
// Thresholds
// ============================================================================

/// Hysteresis thresholds for one family, in degrees.
///
/// For rising families `down < up`; for the inverted pull-up `up < down`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Angle that marks the `down` stage.
    pub down: f64,
    /// Angle that marks the `up` stage.
    pub up: f64,
}

impl Thresholds {
    /// Creates a threshold pair.
    #[must_use]
    pub const fn new(down: f64, up: f64) -> Self {
        Self { down, up }
    }

    fn validate(&self, exercise: Exercise) -> Result<()> {
        let key = threshold_key(exercise);
        if !self.down.is_finite() || !self.up.is_finite() {
            return Err(TrackerError::config_validation(
                format!("thresholds.{key} must be finite numbers"),
                format!("Set thresholds.{key}.down and thresholds.{key}.up to angles in degrees"),
            ));
        }

        let ordered = match exercise.direction() {
            Direction::Rising => self.down < self.up,
            Direction::Falling => self.up < self.down,
        };
        if !ordered {
            let expected = match exercise.direction() {
                Direction::Rising => "down < up",
                Direction::Falling => "up < down",
            };
            return Err(TrackerError::config_validation(
                format!(
                    "thresholds.{key} are out of order (down = {}, up = {})",
                    self.down, self.up
                ),
                format!("{exercise} expects {expected}; adjust thresholds.{key} in your posturight.json"),
            ));
        }

        Ok(())
    }
}

const fn threshold_key(exercise: Exercise) -> &'static str {
    match exercise {
        Exercise::Squat => "squat",
        Exercise::PushUp => "pushUp",
        Exercise::PullUp => "pullUp",
        Exercise::SitUp => "sitUp",
        Exercise::Unknown => "unknown",
    }
}

const fn default_squat() -> Thresholds {
    Thresholds::new(100.0, 150.0)
}

const fn default_push_up() -> Thresholds {
    Thresholds::new(100.0, 150.0)
}

const fn default_pull_up() -> Thresholds {
    Thresholds::new(145.0, 95.0)
}

const fn default_sit_up() -> Thresholds {
    Thresholds::new(80.0, 100.0)
}

/// Thresholds for every known family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdTable {
    /// Knee angle thresholds.
    #[serde(default = "default_squat")]
    pub squat: Thresholds,
    /// Elbow angle thresholds.
    #[serde(default = "default_push_up")]
    pub push_up: Thresholds,
    /// Elbow angle thresholds (inverted).
    #[serde(default = "default_pull_up")]
    pub pull_up: Thresholds,
    /// Abdomen angle thresholds.
    #[serde(default = "default_sit_up")]
    pub sit_up: Thresholds,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            squat: default_squat(),
            push_up: default_push_up(),
            pull_up: default_pull_up(),
            sit_up: default_sit_up(),
        }
    }
}

impl ThresholdTable {
    /// Thresholds for `exercise`. `Unknown` maps to the squat row and is
    /// never consulted by the state machine.
    #[must_use]
    pub const fn for_exercise(&self, exercise: Exercise) -> Thresholds {
        match exercise {
            Exercise::Squat | Exercise::Unknown => self.squat,
            Exercise::PushUp => self.push_up,
            Exercise::PullUp => self.pull_up,
            Exercise::SitUp => self.sit_up,
        }
    }
}

// ============================================================================
// PostureLimits
// ============================================================================

const fn default_push_up_min_abdomen() -> f64 {
    140.0
}

const fn default_push_up_max_elbow_asymmetry() -> f64 {
    30.0
}

const fn default_squat_min_knee() -> f64 {
    90.0
}

const fn default_sit_up_min_abdomen() -> f64 {
    100.0
}

const fn default_pull_up_min_abdomen() -> f64 {
    100.0
}

/// Limits for the advisory posture heuristics, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostureLimits {
    /// Push-up torso angle below which the hips are sagging.
    #[serde(default = "default_push_up_min_abdomen")]
    pub push_up_min_abdomen: f64,
    /// Largest tolerated left/right elbow difference during push-ups.
    #[serde(default = "default_push_up_max_elbow_asymmetry")]
    pub push_up_max_elbow_asymmetry: f64,
    /// Mean knee angle below which a squat is too deep.
    #[serde(default = "default_squat_min_knee")]
    pub squat_min_knee: f64,
    /// Sit-up torso angle floor.
    #[serde(default = "default_sit_up_min_abdomen")]
    pub sit_up_min_abdomen: f64,
    /// Pull-up torso angle floor.
    #[serde(default = "default_pull_up_min_abdomen")]
    pub pull_up_min_abdomen: f64,
}

impl Default for PostureLimits {
    fn default() -> Self {
        Self {
            push_up_min_abdomen: default_push_up_min_abdomen(),
            push_up_max_elbow_asymmetry: default_push_up_max_elbow_asymmetry(),
            squat_min_knee: default_squat_min_knee(),
            sit_up_min_abdomen: default_sit_up_min_abdomen(),
            pull_up_min_abdomen: default_pull_up_min_abdomen(),
        }
    }
}

impl PostureLimits {
    fn validate(&self) -> Result<()> {
        let limits = [
            ("pushUpMinAbdomen", self.push_up_min_abdomen),
            ("pushUpMaxElbowAsymmetry", self.push_up_max_elbow_asymmetry),
            ("squatMinKnee", self.squat_min_knee),
            ("sitUpMinAbdomen", self.sit_up_min_abdomen),
            ("pullUpMinAbdomen", self.pull_up_min_abdomen),
        ];
        for (key, value) in limits {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackerError::config_validation(
                    format!("posture.{key} must be a non-negative angle"),
                    format!("Set posture.{key} to an angle in degrees in your posturight.json"),
                ));
            }
        }
        Ok(())
    }
}
