//! End-to-end tests for the tracking session
//!
//! These tests replay recorded frame traces through a full `Session` and
//! check rep counts, stages and frame statistics.

use std::path::PathBuf;
use std::time::Duration;

use posturight_core::{
    read_trace, ActiveExercise, AngleName, Exercise, FrameInput, FrameRecord, ManualClock, Mode,
    Prediction, Session, SessionSummary, SmoothedAngleSet, Stage, TrackerConfig,
};

/// Path to the fixture directory.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Replays `frames` with their recorded timestamps.
fn replay(session: &mut Session<ManualClock>, frames: &[FrameRecord]) -> SessionSummary {
    for record in frames {
        if let Some(t) = record.t {
            session.clock_mut().set_secs(t);
        }
        session.process_frame(&record.input);
    }
    session.summary()
}

fn knees(angle: f64) -> FrameInput {
    FrameInput::new(
        SmoothedAngleSet::empty()
            .with(AngleName::LeftKnee, angle)
            .with(AngleName::RightKnee, angle),
    )
}

fn elbows(angle: f64) -> FrameInput {
    FrameInput::new(
        SmoothedAngleSet::empty()
            .with(AngleName::LeftElbow, angle)
            .with(AngleName::RightElbow, angle),
    )
}

fn approx_secs(at: Duration, secs: f64) -> bool {
    (at.as_secs_f64() - secs).abs() < 1e-6
}

/// Tests a manual squat trace with gaps and a partial frame.
#[test]
fn test_manual_squat_trace() {
    let frames = read_trace(fixture_path().join("squat_manual.jsonl")).expect("trace loads");
    assert_eq!(frames.len(), 27);

    let mut session = Session::new(
        &TrackerConfig::default(),
        Mode::manual(Exercise::Squat),
        ManualClock::new(),
    );
    let summary = replay(&mut session, &frames);

    assert_eq!(summary.exercise, "squat");
    assert_eq!(summary.total_reps, 3);
    assert_eq!(summary.good_frames, 25);
    assert_eq!(summary.bad_frames, 2);
    assert_eq!(summary.waiting_frames, 0);
    assert!(approx_secs(summary.duration, 2.6));

    let times: Vec<f64> = summary.reps.iter().map(|r| r.at.as_secs_f64()).collect();
    assert_eq!(times.len(), 3);
    for (actual, expected) in times.iter().zip([0.8, 1.7, 2.6]) {
        assert!((actual - expected).abs() < 1e-6, "rep at {actual}, expected {expected}");
    }
    assert_eq!(session.state().stage(Exercise::Squat), Some(Stage::Up));
}

/// Tests classifier mode switching families and skipping uncertain frames.
#[test]
fn test_classifier_trace() {
    let frames = read_trace(fixture_path().join("auto_mixed.jsonl")).expect("trace loads");

    let config = TrackerConfig::default();
    let mut session = Session::new(
        &config,
        Mode::classifier(config.confidence_threshold),
        ManualClock::new(),
    );
    let summary = replay(&mut session, &frames);

    assert_eq!(summary.exercise, "auto");
    assert_eq!(summary.total_reps, 3);
    assert_eq!(summary.waiting_frames, 3);
    assert_eq!(summary.good_frames, 20);
    assert_eq!(summary.bad_frames, 1);

    let families: Vec<Exercise> = summary.reps.iter().map(|r| r.exercise).collect();
    assert_eq!(
        families,
        vec![Exercise::Squat, Exercise::PullUp, Exercise::PullUp]
    );
    assert!(summary.reps.iter().all(|r| r.confidence >= 0.75));
    assert_eq!(session.state().stage(Exercise::PullUp), Some(Stage::Up));
    assert_eq!(session.state().stage(Exercise::PushUp), None);
}

/// Tests that a stricter threshold gates more frames.
#[test]
fn test_classifier_trace_with_strict_threshold() {
    let frames = read_trace(fixture_path().join("auto_mixed.jsonl")).expect("trace loads");

    let mut session = Session::new(
        &TrackerConfig::default(),
        Mode::classifier(0.9),
        ManualClock::new(),
    );
    let summary = replay(&mut session, &frames);

    assert_eq!(summary.total_reps, 1);
    assert_eq!(summary.waiting_frames, 15);
    assert_eq!(summary.reps[0].exercise, Exercise::Squat);
}

/// Tests the fixture configuration file end to end.
#[test]
fn test_fixture_config_changes_behaviour() {
    let config = TrackerConfig::load_from_dir(&fixture_path()).expect("config loads");
    assert_eq!(config.smooth_window, 1);
    assert!((config.confidence_threshold - 0.8).abs() < f64::EPSILON);
    assert_eq!(config.output_dir, "workout-reports");
    // Sections not named in the file keep their defaults
    assert!((config.thresholds.squat.down - 100.0).abs() < f64::EPSILON);
    assert!((config.thresholds.sit_up.up - 110.0).abs() < f64::EPSILON);

    let frames = read_trace(fixture_path().join("auto_mixed.jsonl")).expect("trace loads");
    let mut session = Session::new(
        &config,
        Mode::classifier(config.confidence_threshold),
        ManualClock::new(),
    );
    let summary = replay(&mut session, &frames);

    assert_eq!(summary.total_reps, 3);
    let times: Vec<f64> = summary.reps.iter().map(|r| r.at.as_secs_f64()).collect();
    for (actual, expected) in times.iter().zip([0.6, 1.5, 2.1]) {
        assert!((actual - expected).abs() < 1e-6, "rep at {actual}, expected {expected}");
    }
}

/// Squat scenario: `[160, 160, 95, 95, 160]` from `down` counts once.
#[test]
fn test_squat_scenario() {
    let mut session = Session::new(
        &TrackerConfig::default(),
        Mode::manual(Exercise::Squat),
        ManualClock::new(),
    );
    session
        .state_mut()
        .set_stage(Exercise::Squat, Some(Stage::Down));

    let mut last = None;
    for (angle, t) in [(160.0, 0.0), (160.0, 0.05), (95.0, 0.10), (95.0, 0.20), (160.0, 0.40)] {
        session.clock_mut().set_secs(t);
        last = Some(session.process_frame(&knees(angle)));
    }

    let last = last.expect("frames processed");
    assert_eq!(last.counter, 1);
    assert_eq!(last.stage, Some(Stage::Up));
}

/// Pull-up scenario on unsmoothed angles: resolves `down`, counts on the drop.
#[test]
fn test_pull_up_scenario_unsmoothed() {
    let config = TrackerConfig {
        smooth_window: 1,
        ..Default::default()
    };
    let mut session = Session::new(&config, Mode::manual(Exercise::PullUp), ManualClock::new());

    let first = session.process_frame(&elbows(150.0));
    assert_eq!(first.stage, Some(Stage::Down));

    session.clock_mut().set_secs(0.5);
    let second = session.process_frame(&elbows(90.0));
    assert!(second.rep_counted);

    session.clock_mut().set_secs(1.0);
    let third = session.process_frame(&elbows(150.0));
    assert_eq!(third.counter, 1);
    assert_eq!(third.stage, Some(Stage::Down));
}

/// Debounce scenario: transitions at 0.00 s and 0.05 s count once.
#[test]
fn test_debounce_scenario() {
    let config = TrackerConfig {
        smooth_window: 1,
        ..Default::default()
    };
    let mut session = Session::new(&config, Mode::manual(Exercise::Squat), ManualClock::new());
    session
        .state_mut()
        .set_stage(Exercise::Squat, Some(Stage::Down));

    let first = session.process_frame(&knees(160.0));
    assert!(first.rep_counted);

    session.clock_mut().set_secs(0.02);
    session.process_frame(&knees(90.0));

    session.clock_mut().set_secs(0.05);
    let second = session.process_frame(&knees(160.0));
    assert!(!second.rep_counted);
    assert_eq!(second.stage, Some(Stage::Up));
    assert_eq!(session.counter(), 1);
}

/// Classifier gating scenario: squat at 0.60 confidence does not step.
#[test]
fn test_gating_scenario() {
    let mut session = Session::new(
        &TrackerConfig {
            smooth_window: 1,
            ..Default::default()
        },
        Mode::classifier(0.75),
        ManualClock::new(),
    );

    let prior =
        session.process_frame(&knees(120.0).with_prediction(Prediction::new(Exercise::Squat, 0.9)));
    assert_eq!(prior.stage, Some(Stage::Down));

    session.clock_mut().set_secs(1.0);
    let gated = session
        .process_frame(&knees(170.0).with_prediction(Prediction::new(Exercise::Squat, 0.60)));

    assert_eq!(gated.active, ActiveExercise::Waiting);
    assert_eq!(gated.counter, prior.counter);
    assert_eq!(gated.stage, prior.stage);
    assert!((gated.progress - prior.progress).abs() < f64::EPSILON);
    assert_eq!(session.state().stage(Exercise::Squat), Some(Stage::Down));

    // The next confident frame picks up from the preserved stage
    session.clock_mut().set_secs(1.1);
    let resumed = session
        .process_frame(&knees(170.0).with_prediction(Prediction::new(Exercise::Squat, 0.95)));
    assert!(resumed.rep_counted);
}

/// Tests that independent sessions never share state.
#[test]
fn test_sessions_are_isolated() {
    let config = TrackerConfig {
        smooth_window: 1,
        ..Default::default()
    };
    let mut a = Session::new(&config, Mode::manual(Exercise::Squat), ManualClock::new());
    let mut b = Session::new(&config, Mode::manual(Exercise::Squat), ManualClock::new());

    for (angle, t) in [(160.0, 0.0), (90.0, 0.3), (160.0, 0.6)] {
        a.clock_mut().set_secs(t);
        a.process_frame(&knees(angle));
    }

    assert_eq!(a.counter(), 1);
    assert_eq!(b.counter(), 0);
    assert_eq!(b.state().stage(Exercise::Squat), None);

    let outcome = b.process_frame(&knees(90.0));
    assert_eq!(outcome.stage, Some(Stage::Down));
    assert_eq!(a.state().stage(Exercise::Squat), Some(Stage::Up));
}
