//! PostuRight Report Generation
//!
//! Types and writers for end-of-session workout reports. A [`SessionReport`]
//! can be serialized to JSON, rendered as the plain-text fitness report, or
//! appended as CSV rows to the long-running history and rep logs.
//!
//! # Generators
//!
//! - [`json`] - JSON reports, compact or pretty
//! - [`TextGenerator`] - The human-readable fitness report
//! - [`csv`] - `history.csv` and the per-rep session log
//!
//! # Example
//!
//! ```rust
//! use posturight_report::{SessionReport, TextGenerator};
//!
//! let report = SessionReport::builder()
//!     .exercise("squat")
//!     .total_reps(12)
//!     .duration_seconds(95)
//!     .frames(2400, 300, 0)
//!     .build()
//!     .unwrap();
//!
//! let text = TextGenerator::new(&report).generate();
//! assert!(text.contains("Total Reps      : 12"));
//! ```

pub mod csv;
pub mod json;
mod text;

pub use text::TextGenerator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to serialize the report to JSON.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to read or write report files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write a CSV log row.
    #[error("failed to write CSV log: {0}")]
    Csv(#[from] ::csv::Error),

    /// Invalid report data.
    #[error("invalid report data: {0}")]
    InvalidData(String),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================================
// Session Report
// ============================================================================

/// Everything written about one finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Exercise label (`"auto"` for classifier-driven sessions).
    pub exercise: String,

    /// Reps counted.
    pub total_reps: u32,

    /// Session length in whole seconds.
    pub duration_seconds: u64,

    /// Frames with good posture.
    pub good_frames: u64,

    /// Frames with bad posture.
    pub bad_frames: u64,

    /// Frames spent waiting for a confident classifier label.
    #[serde(default)]
    pub waiting_frames: u64,

    /// Good frames over evaluated frames, in percent.
    pub accuracy: f64,

    /// When the session started.
    pub started_at: DateTime<Utc>,

    /// When the report was generated.
    pub generated_at: DateTime<Utc>,

    /// Every counted rep, in order.
    #[serde(default)]
    pub reps: Vec<RepRecord>,
}

impl Default for SessionReport {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            exercise: String::new(),
            total_reps: 0,
            duration_seconds: 0,
            good_frames: 0,
            bad_frames: 0,
            waiting_frames: 0,
            accuracy: 0.0,
            started_at: now,
            generated_at: now,
            reps: Vec::new(),
        }
    }
}

impl SessionReport {
    /// Creates a new report builder.
    #[must_use]
    pub fn builder() -> ReportBuilder {
        ReportBuilder::default()
    }

    /// File name stem shared by the text and JSON reports,
    /// e.g. `squat_2026-10-17_09-30-00`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}",
            self.exercise,
            self.generated_at.format("%Y-%m-%d_%H-%M-%S")
        )
    }

    /// Number of frames that received a posture verdict.
    #[must_use]
    pub const fn evaluated_frames(&self) -> u64 {
        self.good_frames + self.bad_frames
    }
}

/// Computes posture accuracy in percent; 0 when nothing was evaluated.
#[must_use]
pub fn accuracy(good_frames: u64, bad_frames: u64) -> f64 {
    let total = good_frames + bad_frames;
    if total == 0 {
        0.0
    } else {
        good_frames as f64 / total as f64 * 100.0
    }
}

/// One counted rep as recorded in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepRecord {
    /// 1-based session rep number.
    pub rep_number: u32,

    /// Family the rep was counted for.
    pub exercise: String,

    /// Seconds since session start.
    pub at_seconds: f64,

    /// Selection confidence on the counting frame.
    pub confidence: f64,

    /// Posture verdict on the counting frame.
    pub posture_ok: bool,
}

impl RepRecord {
    /// Wall-clock time of the rep, given the session start.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn timestamp(&self, started_at: DateTime<Utc>) -> DateTime<Utc> {
        let offset_ms = (self.at_seconds.max(0.0) * 1000.0).round() as i64;
        started_at + chrono::Duration::milliseconds(offset_ms)
    }
}

// ============================================================================
// Report Builder
// ============================================================================

/// Builder for [`SessionReport`]. Accuracy is derived from the frame counts.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    exercise: Option<String>,
    total_reps: u32,
    duration_seconds: u64,
    good_frames: u64,
    bad_frames: u64,
    waiting_frames: u64,
    started_at: Option<DateTime<Utc>>,
    reps: Vec<RepRecord>,
}

impl ReportBuilder {
    /// Sets the exercise label.
    #[must_use]
    pub fn exercise(mut self, exercise: impl Into<String>) -> Self {
        self.exercise = Some(exercise.into());
        self
    }

    /// Sets the rep total.
    #[must_use]
    pub const fn total_reps(mut self, reps: u32) -> Self {
        self.total_reps = reps;
        self
    }

    /// Sets the session length in seconds.
    #[must_use]
    pub const fn duration_seconds(mut self, seconds: u64) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Sets the good, bad and waiting frame counts.
    #[must_use]
    pub const fn frames(mut self, good: u64, bad: u64, waiting: u64) -> Self {
        self.good_frames = good;
        self.bad_frames = bad;
        self.waiting_frames = waiting;
        self
    }

    /// Sets the session start time. Defaults to the build time.
    #[must_use]
    pub const fn started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self
    }

    /// Adds a counted rep.
    #[must_use]
    pub fn rep(mut self, rep: RepRecord) -> Self {
        self.reps.push(rep);
        self
    }

    /// Sets all counted reps.
    #[must_use]
    pub fn reps(mut self, reps: Vec<RepRecord>) -> Self {
        self.reps = reps;
        self
    }

    /// Builds the report.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidData` if the exercise is missing or empty,
    /// or if more reps are listed than counted.
    pub fn build(self) -> Result<SessionReport> {
        let exercise = self
            .exercise
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ReportError::InvalidData("exercise is required".to_string()))?;

        if self.reps.len() > self.total_reps as usize {
            return Err(ReportError::InvalidData(format!(
                "{} rep records for a total of {} reps",
                self.reps.len(),
                self.total_reps
            )));
        }

        let generated_at = Utc::now();
        Ok(SessionReport {
            exercise,
            total_reps: self.total_reps,
            duration_seconds: self.duration_seconds,
            good_frames: self.good_frames,
            bad_frames: self.bad_frames,
            waiting_frames: self.waiting_frames,
            accuracy: accuracy(self.good_frames, self.bad_frames),
            started_at: self.started_at.unwrap_or(generated_at),
            generated_at,
            reps: self.reps,
        })
    }
}
