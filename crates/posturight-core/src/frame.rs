//! Per-frame input and recorded frame traces.
//!
//! A trace is a JSON Lines file with one [`FrameRecord`] per line, e.g.
//!
//! ```text
//! {"t": 0.05, "angles": {"left_knee": 160.0, "right_knee": null}, "prediction": {"label": "squat", "confidence": 0.9}}
//! ```
//!
//! `t` is seconds since the start of the capture. `t` and `prediction` may
//! be omitted; blank lines are skipped.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::angles::RawAngles;
use crate::error::{Result, TrackerError};
use crate::mode::Prediction;

/// What the core consumes for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Raw joint angles from the geometry collaborator.
    pub angles: RawAngles,
    /// Classifier output, if a classifier is running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
}

impl FrameInput {
    /// Input with angles only.
    #[must_use]
    pub const fn new(angles: RawAngles) -> Self {
        Self {
            angles,
            prediction: None,
        }
    }

    /// Attaches a classifier prediction.
    #[must_use]
    pub const fn with_prediction(mut self, prediction: Prediction) -> Self {
        self.prediction = Some(prediction);
        self
    }
}

/// One line of a recorded trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Capture time in seconds since the start of the recording.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<f64>,

    /// The frame payload.
    #[serde(flatten)]
    pub input: FrameInput,
}

/// Reads every frame of a JSON Lines trace.
///
/// # Errors
///
/// Returns `TrackerError::TraceNotFound` if the file doesn't exist,
/// `TrackerError::TraceParseError` with the 1-indexed line number for a bad
/// record, and `TrackerError::Io` for other read failures.
pub fn read_trace(path: impl AsRef<Path>) -> Result<Vec<FrameRecord>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TrackerError::trace_not_found(path)
        } else {
            TrackerError::Io(e)
        }
    })?;

    let records = parse_trace(&content, path)?;
    tracing::debug!(path = %path.display(), frames = records.len(), "Loaded frame trace");
    Ok(records)
}

/// Parses trace content; `origin` is only used in error messages.
///
/// # Errors
///
/// Returns `TrackerError::TraceParseError` for the first bad line.
pub fn parse_trace(content: &str, origin: &Path) -> Result<Vec<FrameRecord>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map_err(|e| TrackerError::trace_parse(origin, index + 1, e.to_string()))
        })
        .collect()
}
