//! Integration tests for report generation from replayed sessions
//!
//! A fixture trace is replayed, the summary converted to a report, and every
//! output (text, JSON, history and rep logs) is written to a temp directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use posturight_core::{read_trace, Exercise, ManualClock, Mode, Session, TrackerConfig};
use posturight_report::{csv, json, RepRecord, ReportError, SessionReport, TextGenerator};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Creates an empty temp directory for one test.
fn output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("Failed to create output dir");
    dir
}

/// Replays the manual squat fixture and builds its report.
fn squat_report() -> SessionReport {
    let frames = read_trace(fixture_path().join("squat_manual.jsonl")).expect("trace loads");
    let mut session = Session::new(
        &TrackerConfig::default(),
        Mode::manual(Exercise::Squat),
        ManualClock::new(),
    );
    for record in &frames {
        if let Some(t) = record.t {
            session.clock_mut().set_secs(t);
        }
        session.process_frame(&record.input);
    }
    let summary = session.summary();

    SessionReport::builder()
        .exercise(&summary.exercise)
        .total_reps(summary.total_reps)
        .duration_seconds(summary.duration.as_secs())
        .frames(
            summary.good_frames,
            summary.bad_frames,
            summary.waiting_frames,
        )
        .started_at(summary.started_at)
        .reps(
            summary
                .reps
                .iter()
                .map(|rep| RepRecord {
                    rep_number: rep.rep_number,
                    exercise: rep.exercise.to_string(),
                    at_seconds: rep.at.as_secs_f64(),
                    confidence: rep.confidence,
                    posture_ok: rep.posture_ok,
                })
                .collect(),
        )
        .build()
        .expect("report builds")
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

/// Tests the text report for a replayed session.
#[test]
fn test_text_report_from_session() {
    let report = squat_report();
    let dir = output_dir("posturight_it_text_report");
    let path = dir.join(format!("{}.txt", report.file_stem()));

    TextGenerator::new(&report)
        .write_to_file(&path)
        .expect("text report written");

    let text = read(&path);
    assert!(text.starts_with("------ PostuRight AI Fitness Report ------\n\n"));
    assert!(text.contains("Exercise        : squat\n"));
    assert!(text.contains("Total Reps      : 3\n"));
    assert!(text.contains("Duration        : 2 seconds\n"));
    assert!(text.contains("Good Frames     : 25\n"));
    assert!(text.contains("Bad Frames      : 2\n"));
    assert!(text.contains("Accuracy        : 92.59%\n"));
    assert!(text.contains("\nReps:\n"));

    std::fs::remove_dir_all(&dir).ok();
}

/// Tests that the JSON report parses back to the same report.
#[test]
fn test_json_report_from_session() {
    let report = squat_report();
    let dir = output_dir("posturight_it_json_report");
    let path = json::write_report(&report, &dir).expect("json report written");
    assert_eq!(path, dir.join(format!("{}.json", report.file_stem())));

    let value: serde_json::Value = serde_json::from_str(&read(&path)).expect("valid JSON");
    assert_eq!(value["exercise"], "squat");
    assert_eq!(value["total_reps"], 3);
    assert_eq!(value["reps"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["reps"][2]["rep_number"], 3);

    let parsed: SessionReport = serde_json::from_str(&read(&path)).expect("report parses");
    assert_eq!(parsed.total_reps, report.total_reps);
    assert_eq!(parsed.started_at, report.started_at);

    std::fs::remove_dir_all(&dir).ok();
}

/// Tests the CSV logs across two sessions written to the same directory.
#[test]
fn test_csv_logs_accumulate() {
    let report = squat_report();
    let dir = output_dir("posturight_it_csv_logs");

    for _ in 0..2 {
        csv::append_history(&dir, &report).expect("history appended");
        csv::append_rep_log(&dir, &report).expect("rep log appended");
    }

    let history = read(&dir.join(csv::HISTORY_FILE_NAME));
    let history_lines: Vec<&str> = history.lines().collect();
    assert_eq!(history_lines.len(), 3);
    assert_eq!(history_lines[0], "Date,Exercise,Reps,Duration(s),Accuracy(%)");
    assert!(history_lines[1].ends_with(",squat,3,2,92.59"));

    let rep_log = read(&dir.join(csv::REP_LOG_FILE_NAME));
    let rep_lines: Vec<&str> = rep_log.lines().collect();
    assert_eq!(rep_lines.len(), 7);
    assert_eq!(
        rep_lines[0],
        "timestamp,exercise,rep_num,confidence,posture,notes"
    );
    assert!(rep_lines[1].contains(",squat,1,1.000,"));
    assert!(rep_lines[3].contains(",squat,3,1.000,"));

    // Rep timestamps are the session start offset by the recorded rep times
    for (line, offset_ms) in rep_lines[1..4].iter().zip([800, 1700, 2600]) {
        let stamp = line.split(',').next().expect("timestamp column");
        let logged = DateTime::parse_from_rfc3339(stamp)
            .expect("RFC 3339 timestamp")
            .with_timezone(&Utc);
        let expected = report.started_at + Duration::milliseconds(offset_ms);
        assert_eq!(logged.timestamp_millis(), expected.timestamp_millis());
    }

    std::fs::remove_dir_all(&dir).ok();
}

/// Tests that a report without an exercise label is rejected.
#[test]
fn test_report_requires_exercise() {
    let result = SessionReport::builder().total_reps(0).build();
    assert!(matches!(result, Err(ReportError::InvalidData(_))));
}
