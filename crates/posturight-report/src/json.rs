//! JSON session reports.
//!
//! A report is stored as `<exercise>_<timestamp>.json` next to the text
//! report, pretty-printed so it can be read without tooling.
//!
//! # Example
//!
//! ```rust
//! use posturight_report::{json, SessionReport};
//!
//! let report = SessionReport::builder()
//!     .exercise("push-up")
//!     .total_reps(8)
//!     .build()
//!     .unwrap();
//!
//! let compact = json::to_json(&report, false).unwrap();
//! assert!(compact.contains(r#""exercise":"push-up""#));
//! ```

use std::path::{Path, PathBuf};

use crate::{Result, SessionReport};

/// Serializes `report`, pretty-printed with 2-space indentation or as a
/// single line.
///
/// # Errors
///
/// Returns [`crate::ReportError::Serialization`] if serialization fails.
pub fn to_json(report: &SessionReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}

/// Writes `report` as pretty JSON into `dir` and returns the file path.
///
/// The file is named after [`SessionReport::file_stem`], so a session
/// written twice overwrites its own report. `dir` must exist.
///
/// # Errors
///
/// Returns [`crate::ReportError::Serialization`] if serialization fails.
/// Returns [`crate::ReportError::Io`] if the file cannot be written.
pub fn write_report(report: &SessionReport, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}.json", report.file_stem()));
    std::fs::write(&path, to_json(report, true)?)?;
    tracing::debug!(path = %path.display(), reps = report.total_reps, "JSON report written");
    Ok(path)
}
