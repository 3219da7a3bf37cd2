//! Append-only CSV logs.
//!
//! Two logs outlive individual sessions:
//!
//! - `history.csv`: one [`HistoryRow`] per finished session
//! - `exercise_session_log.csv`: one [`RepLogRow`] per counted rep
//!
//! The header row is written only when the file is created.

use std::fs::OpenOptions;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use csv::WriterBuilder;

use crate::{Result, SessionReport};

/// File name of the session history log.
pub const HISTORY_FILE_NAME: &str = "history.csv";

/// File name of the per-rep log.
pub const REP_LOG_FILE_NAME: &str = "exercise_session_log.csv";

/// A record that can be appended to a CSV log.
pub trait CsvRecord {
    /// Column names, written once when the file is new.
    const HEADER: &'static [&'static str];

    /// Field values in column order, unescaped.
    fn fields(&self) -> Vec<String>;
}

// ============================================================================
// Rows
// ============================================================================

/// One finished session in `history.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    /// When the session ended.
    pub date: DateTime<Utc>,
    /// Exercise label.
    pub exercise: String,
    /// Reps counted.
    pub reps: u32,
    /// Session length in seconds.
    pub duration_seconds: u64,
    /// Posture accuracy in percent.
    pub accuracy: f64,
}

impl HistoryRow {
    /// Summarises a report.
    #[must_use]
    pub fn from_report(report: &SessionReport) -> Self {
        Self {
            date: report.generated_at,
            exercise: report.exercise.clone(),
            reps: report.total_reps,
            duration_seconds: report.duration_seconds,
            accuracy: report.accuracy,
        }
    }
}

impl CsvRecord for HistoryRow {
    const HEADER: &'static [&'static str] =
        &["Date", "Exercise", "Reps", "Duration(s)", "Accuracy(%)"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.exercise.clone(),
            self.reps.to_string(),
            self.duration_seconds.to_string(),
            format!("{:.2}", self.accuracy),
        ]
    }
}

/// One counted rep in the session log.
#[derive(Debug, Clone, PartialEq)]
pub struct RepLogRow {
    /// Wall-clock time of the rep.
    pub timestamp: DateTime<Utc>,
    /// Family the rep was counted for.
    pub exercise: String,
    /// 1-based session rep number.
    pub rep_num: u32,
    /// Selection confidence.
    pub confidence: f64,
    /// Posture verdict.
    pub posture_ok: bool,
    /// Free-form notes.
    pub notes: String,
}

impl RepLogRow {
    /// One row per counted rep of `report`.
    #[must_use]
    pub fn from_report(report: &SessionReport) -> Vec<Self> {
        report
            .reps
            .iter()
            .map(|rep| Self {
                timestamp: rep.timestamp(report.started_at),
                exercise: rep.exercise.clone(),
                rep_num: rep.rep_number,
                confidence: rep.confidence,
                posture_ok: rep.posture_ok,
                notes: String::new(),
            })
            .collect()
    }
}

impl CsvRecord for RepLogRow {
    const HEADER: &'static [&'static str] = &[
        "timestamp",
        "exercise",
        "rep_num",
        "confidence",
        "posture",
        "notes",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.exercise.clone(),
            self.rep_num.to_string(),
            format!("{:.3}", self.confidence),
            if self.posture_ok { "Good" } else { "Bad" }.to_string(),
            self.notes.clone(),
        ]
    }
}

// ============================================================================
// Writing
// ============================================================================

/// Appends `rows` to the CSV file at `path`.
///
/// Creates the file with a header row if it does not exist yet. Parent
/// directories must exist. Appending zero rows to a missing file still
/// creates it with its header.
///
/// # Errors
///
/// Returns [`crate::ReportError::Io`] if the file cannot be opened, or
/// [`crate::ReportError::Csv`] if a row cannot be written.
pub fn append_rows<R: CsvRecord>(path: &Path, rows: &[R]) -> Result<()> {
    let is_new = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    if is_new {
        writer.write_record(R::HEADER)?;
    }
    for row in rows {
        writer.write_record(row.fields())?;
    }
    writer.flush()?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "CSV rows appended");
    Ok(())
}

/// Appends one session to `history.csv` inside `dir`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn append_history(dir: &Path, report: &SessionReport) -> Result<()> {
    append_rows(
        &dir.join(HISTORY_FILE_NAME),
        &[HistoryRow::from_report(report)],
    )
}

/// Appends every counted rep of `report` to the rep log inside `dir`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn append_rep_log(dir: &Path, report: &SessionReport) -> Result<()> {
    append_rows(&dir.join(REP_LOG_FILE_NAME), &RepLogRow::from_report(report))
}
