//! PostuRight CLI
//!
//! Replays a recorded frame trace through the tracker and writes the
//! session reports.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use posturight_core::{
    read_trace, Clock, Exercise, FrameOutcome, FrameRecord, ManualClock, Mode,
    MonotonicClock, Session, SessionSummary, SmoothedAngleSet, TrackerConfig,
};
use posturight_report::{csv, json, RepRecord, SessionReport, TextGenerator};
use tracing_subscriber::EnvFilter;

/// PostuRight - Exercise Rep Counter
///
/// Counts repetitions and checks posture from a JSON Lines trace of
/// per-frame joint angles.
#[derive(Parser, Debug)]
#[command(name = "posturight")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the frame trace (JSON Lines)
    #[arg(value_name = "TRACE")]
    trace: PathBuf,

    /// Exercise to count in manual mode
    #[arg(
        short,
        long,
        value_name = "NAME",
        default_value = "squat",
        value_parser = ["squat", "push-up", "pull-up", "sit-up"],
        conflicts_with = "auto"
    )]
    exercise: String,

    /// Use the per-frame classifier predictions instead of a fixed exercise
    #[arg(short, long)]
    auto: bool,

    /// Path to configuration file (default: posturight.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Output directory for reports
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Time reps with the wall clock instead of the recorded timestamps
    #[arg(long)]
    wall_clock: bool,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::debug!(config = ?args.config, "Config file");
    tracing::debug!(output_dir = ?args.output_dir, "Output directory");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Loads config and trace, replays every frame and writes the reports.
fn run(args: &Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(ref output_dir) = args.output_dir {
        config.output_dir.clone_from(output_dir);
    }

    // Re-validate after overrides
    config.validate()?;

    let mode = if args.auto {
        Mode::classifier(config.confidence_threshold)
    } else {
        Mode::manual(Exercise::parse(&args.exercise))
    };

    print_config(&config, mode, &args.trace);

    let frames = read_trace(&args.trace)?;
    println!("  Frames: {}", frames.len());
    println!();

    let summary = if args.wall_clock {
        let mut session = Session::new(&config, mode, MonotonicClock::start());
        replay(&mut session, &frames, |_, _| {})
    } else {
        let mut session = Session::new(&config, mode, ManualClock::new());
        replay(&mut session, &frames, |clock, record| {
            if let Some(t) = record.t {
                clock.set_secs(t);
            }
        })
    };

    print_summary(&summary);
    write_reports(&summary, Path::new(&config.output_dir))
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<TrackerConfig> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            TrackerConfig::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => TrackerConfig::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Feeds every frame to `session`, syncing its clock first with `sync`.
fn replay<C: Clock>(
    session: &mut Session<C>,
    frames: &[FrameRecord],
    mut sync: impl FnMut(&mut C, &FrameRecord),
) -> SessionSummary {
    for record in frames {
        sync(session.clock_mut(), record);
        let outcome = session.process_frame(&record.input);
        if outcome.rep_counted {
            print_rep(&outcome, &session.smoothed());
        }
    }
    session.summary()
}

/// Prints the loaded configuration.
fn print_config(config: &TrackerConfig, mode: Mode, trace: &Path) {
    println!("Configuration loaded:");
    println!("  Trace: {}", trace.display());
    println!("  Mode: {mode}");
    println!("  Smoothing window: {}", config.smooth_window);
    println!("  Min rep interval: {:.2}s", config.min_rep_interval_secs);
    println!("  Output directory: {}", config.output_dir);
}

/// Prints one counted rep with the angles relevant to its exercise.
fn print_rep(outcome: &FrameOutcome, angles: &SmoothedAngleSet) {
    let Some(exercise) = outcome.active.exercise() else {
        return;
    };
    println!(
        "Rep {:>3}  {:<8} at {:>7.2}s  posture {:<4}  {}",
        outcome.counter,
        exercise,
        outcome.at.as_secs_f64(),
        if outcome.posture_ok { "good" } else { "bad" },
        format_angles(exercise, angles)
    );
}

/// Formats the display angles of `exercise`, e.g. `Knee L: 95°  Knee R: N/A`.
fn format_angles(exercise: Exercise, angles: &SmoothedAngleSet) -> String {
    exercise
        .display_angles()
        .iter()
        .map(|&name| format!("{}: {}", name.label(), format_angle(angles.get(name))))
        .collect::<Vec<_>>()
        .join("  ")
}

fn format_angle(angle: Option<f64>) -> String {
    angle.map_or_else(|| "N/A".to_string(), |a| format!("{a:.0}°"))
}

/// Prints a summary of the session.
fn print_summary(summary: &SessionSummary) {
    println!();
    println!("Session complete:");
    println!("  Exercise: {}", summary.exercise);
    println!("  Total reps: {}", summary.total_reps);
    println!("  Duration: {:.1}s", summary.duration.as_secs_f64());
    println!(
        "  Frames: {} good, {} bad, {} waiting",
        summary.good_frames, summary.bad_frames, summary.waiting_frames
    );
    println!("  Accuracy: {:.2}%", summary.accuracy);
}

/// Converts a session summary into a report.
fn build_report(summary: &SessionSummary) -> anyhow::Result<SessionReport> {
    let reps = summary
        .reps
        .iter()
        .map(|rep| RepRecord {
            rep_number: rep.rep_number,
            exercise: rep.exercise.to_string(),
            at_seconds: rep.at.as_secs_f64(),
            confidence: rep.confidence,
            posture_ok: rep.posture_ok,
        })
        .collect();

    let report = SessionReport::builder()
        .exercise(&summary.exercise)
        .total_reps(summary.total_reps)
        .duration_seconds(summary.duration.as_secs())
        .frames(
            summary.good_frames,
            summary.bad_frames,
            summary.waiting_frames,
        )
        .started_at(summary.started_at)
        .reps(reps)
        .build()?;
    Ok(report)
}

/// Writes the text and JSON reports and appends to the CSV logs.
fn write_reports(summary: &SessionSummary, output_dir: &Path) -> anyhow::Result<()> {
    println!();
    println!("Generating reports...");

    let report = build_report(summary)?;

    // Ensure output directory exists
    std::fs::create_dir_all(output_dir)?;

    let stem = report.file_stem();

    let text_path = output_dir.join(format!("{stem}.txt"));
    TextGenerator::new(&report).write_to_file(&text_path)?;
    println!("  Text report: {}", text_path.display());

    let json_path = json::write_report(&report, output_dir)?;
    println!("  JSON report: {}", json_path.display());

    csv::append_history(output_dir, &report)?;
    println!(
        "  History: {}",
        output_dir.join(csv::HISTORY_FILE_NAME).display()
    );

    if !report.reps.is_empty() {
        csv::append_rep_log(output_dir, &report)?;
        println!(
            "  Rep log: {}",
            output_dir.join(csv::REP_LOG_FILE_NAME).display()
        );
    }

    tracing::info!(output_dir = %output_dir.display(), "Reports written");
    Ok(())
}
