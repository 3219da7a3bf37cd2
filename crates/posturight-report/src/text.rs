//! Plain-text fitness report.
//!
//! The layout is a fixed-width key/value block, written next to the JSON
//! report as `<exercise>_<timestamp>.txt`. Counted reps are listed after the
//! totals when the session recorded any.

use std::fmt::Write;
use std::path::Path;

use crate::{Result, SessionReport};

const TITLE: &str = "------ PostuRight AI Fitness Report ------";

/// Renders a [`SessionReport`] as the plain-text fitness report.
pub struct TextGenerator<'a> {
    report: &'a SessionReport,
}

impl<'a> TextGenerator<'a> {
    /// Creates a new text generator for the given report.
    #[must_use]
    pub const fn new(report: &'a SessionReport) -> Self {
        Self { report }
    }

    /// Generates the complete report.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        self.write_totals(&mut output);
        self.write_reps(&mut output);

        output
    }

    /// Writes the report to `path`, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ReportError::Io`] if the file cannot be written.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.generate())?;
        Ok(())
    }

    fn write_totals(&self, output: &mut String) {
        let report = self.report;

        let _ = writeln!(output, "{TITLE}\n");
        let _ = writeln!(output, "{:<16}: {}", "Exercise", report.exercise);
        let _ = writeln!(output, "{:<16}: {}", "Total Reps", report.total_reps);
        let _ = writeln!(
            output,
            "{:<16}: {} seconds",
            "Duration", report.duration_seconds
        );
        let _ = writeln!(output, "{:<16}: {}", "Good Frames", report.good_frames);
        let _ = writeln!(output, "{:<16}: {}", "Bad Frames", report.bad_frames);
        if report.waiting_frames > 0 {
            let _ = writeln!(output, "{:<16}: {}", "Waiting Frames", report.waiting_frames);
        }
        let _ = writeln!(output, "{:<16}: {:.2}%", "Accuracy", report.accuracy);
        let _ = writeln!(
            output,
            "{:<16}: {}",
            "Date",
            report.generated_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    fn write_reps(&self, output: &mut String) {
        if self.report.reps.is_empty() {
            return;
        }

        let _ = writeln!(output, "\nReps:");
        for rep in &self.report.reps {
            let _ = writeln!(
                output,
                "  #{:<3} {:<8} at {:>7.2}s  confidence {:.3}  posture {}",
                rep.rep_number,
                rep.exercise,
                rep.at_seconds,
                rep.confidence,
                if rep.posture_ok { "good" } else { "bad" }
            );
        }
    }
}
