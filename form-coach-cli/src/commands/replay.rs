use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use form_coach_engine::{
    progress_message, Cue, CueTracker, ExerciseKind, ExerciseSession, FrameReport,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

use crate::config::Config;
use crate::error::ReplayError;
use crate::models::{parse_records, FrameRecord, SessionSummary};

/// Pause on the final frame of a realtime replay once the target is reached
const TARGET_LINGER: Duration = Duration::from_millis(1500);

#[derive(Args)]
pub struct ReplayCommand {
    /// JSON Lines file of recorded frames
    file: PathBuf,

    /// Exercise to coach (squat or lunge)
    #[arg(short, long, default_value = "squat")]
    exercise: ExerciseKind,

    /// Stop after this many reps; overrides the configured target, 0 disables
    #[arg(short, long)]
    target: Option<u32>,

    /// Pace frames at --fps instead of replaying as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Playback rate for --realtime
    #[arg(long)]
    fps: Option<f64>,

    /// Emit JSON Lines instead of coloured text
    #[arg(long)]
    json: bool,
}

/// Everything produced for one replayed frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameOutcome {
    pub frame: u64,
    pub timestamp_ms: Option<u64>,
    #[serde(flatten)]
    pub report: FrameReport,
    pub cues: Vec<Cue>,
    /// Target progress, set on frames that complete a rep
    pub progress: Option<String>,
}

/// One exercise session fed from recorded frames
pub struct Replay {
    session: ExerciseSession,
    tracker: CueTracker,
    summary: SessionSummary,
}

impl Replay {
    pub fn new(exercise: ExerciseKind, config: &Config, target: u32) -> Result<Self> {
        let session = ExerciseSession::new(exercise, &config.engine)
            .context("Invalid engine configuration")?;

        Ok(Self {
            session,
            tracker: CueTracker::new(target),
            summary: SessionSummary::new(exercise, target),
        })
    }

    pub fn feed(&mut self, record: &FrameRecord) -> FrameOutcome {
        let report = self
            .session
            .process_landmarks(&record.landmarks, record.width, record.height);
        let cues = self.tracker.observe(&report);
        self.summary.record(&report);

        let progress = if report.rep_completed {
            progress_message(report.rep_count, self.tracker.target())
        } else {
            None
        };

        FrameOutcome {
            frame: record.frame,
            timestamp_ms: record.timestamp_ms,
            report,
            cues,
            progress,
        }
    }

    pub fn target_reached(&self) -> bool {
        self.summary.target_reached
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    pub fn finish(mut self) -> SessionSummary {
        self.summary.finish();
        self.summary
    }
}

impl ReplayCommand {
    pub async fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let config = Config::load(config_path)?;
        let target = self.target.unwrap_or(config.replay.target);
        let period = frame_period(self.fps.unwrap_or(config.replay.fps))?;

        let contents = tokio::fs::read_to_string(&self.file)
            .await
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let records = parse_records(&contents)
            .with_context(|| format!("Failed to parse {}", self.file.display()))?;

        tracing::info!(
            exercise = %self.exercise,
            frames = records.len(),
            target,
            "Starting replay"
        );

        let mut replay = Replay::new(self.exercise, &config, target)?;
        let mut ticker = self.realtime.then(|| {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        if !self.json {
            println!("Replaying {} ({} frames)", self.exercise.to_string().bold(), records.len());
            println!();
        }

        for record in &records {
            if let Some(ticker) = ticker.as_mut() {
                ticker.tick().await;
            }

            let outcome = replay.feed(record);
            if self.json {
                println!("{}", serde_json::to_string(&outcome)?);
            } else {
                println!("{}", render_frame(&outcome));
            }

            if replay.target_reached() {
                tracing::info!(reps = replay.summary().reps, "Target reached, stopping replay");
                if self.realtime {
                    time::sleep(TARGET_LINGER).await;
                }
                break;
            }
        }

        let summary = replay.finish();
        if self.json {
            println!("{}", serde_json::json!({ "summary": summary }));
        } else {
            print_summary(&summary);
        }

        Ok(())
    }
}

/// Interval between paced frames; rates too low or too high to schedule are rejected
fn frame_period(fps: f64) -> Result<Duration, ReplayError> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(ReplayError::InvalidFrameRate(fps));
    }
    let period =
        Duration::try_from_secs_f64(1.0 / fps).map_err(|_| ReplayError::InvalidFrameRate(fps))?;
    Ok(period.max(Duration::from_millis(1)))
}

/// Text rendering of one frame: green when correct, red when not, yellow
/// while tracking is not stable
pub fn render_frame(outcome: &FrameOutcome) -> String {
    let report = &outcome.report;
    let status = format!(
        "[{:>5}] reps {:>3} {:<5}",
        outcome.frame,
        report.rep_count,
        report.phase.to_string()
    );

    let message = if !report.is_stable {
        report.message().yellow()
    } else if report.is_correct() {
        report.message().green()
    } else {
        report.message().red()
    };

    let mut lines = vec![format!("{} {}", status.dimmed(), message)];
    if let Some(notice) = &report.notice {
        lines.push(format!("        {}", notice.green().bold()));
    }
    for cue in &outcome.cues {
        lines.push(format!("        ♪ {}", cue_label(*cue).cyan()));
    }
    if let Some(progress) = &outcome.progress {
        lines.push(format!("        {}", progress.bold()));
    }

    lines.join("\n")
}

fn cue_label(cue: Cue) -> &'static str {
    match cue {
        Cue::Start => "start",
        Cue::Rep => "rep",
        Cue::FormError => "form error",
        Cue::TargetReached => "target reached",
    }
}

fn print_summary(summary: &SessionSummary) {
    println!();
    println!("Session Summary");
    println!("────────────────────────────────");
    println!("Session:    {}", summary.id);
    println!("Exercise:   {}", summary.exercise);
    println!(
        "Frames:     {} ({} stable, {} correct)",
        summary.frames, summary.stable_frames, summary.correct_frames
    );

    if summary.target > 0 {
        println!("Reps:       {}/{}", summary.reps, summary.target);
    } else {
        println!("Reps:       {}", summary.reps);
    }
    if let Some(accuracy) = summary.accuracy() {
        println!("Accuracy:   {:.0}%", accuracy * 100.0);
    }
    if summary.error_frames > 0 {
        println!("Errors:     {}", summary.error_frames);
    }

    if !summary.violations.is_empty() {
        println!();
        println!("Form issues:");
        for (message, count) in &summary.violations {
            println!("  - {} ({}x)", message, count);
        }
    }

    if summary.target_reached {
        println!();
        println!("{}", "✓ Target reached!".green().bold());
    }
}
