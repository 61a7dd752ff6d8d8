//! `focusflow timer`: a pomodoro countdown driven one command at a time.
//!
//! The tracker is kept as JSON between invocations. Sessions it closes are
//! appended to the session snapshot that `focusflow stats` reads.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use focusflow_core::storage::{append_sessions, data_dir};
use focusflow_core::{
    PomodoroTimer, SessionTracker, SessionType, Settings, TimerEvent, TimerState, TrackerUpdate,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::parse_instant;

#[derive(Args)]
pub struct TimerArgs {
    /// Timer state file (default: timer.json in the data directory)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,
    /// Session snapshot that finished sessions are appended to
    /// (default: sessions.json in the data directory)
    #[arg(long, global = true)]
    pub sessions: Option<PathBuf>,
    /// Reference instant, RFC 3339 or local `YYYY-MM-DDTHH:MM:SS` (default: now)
    #[arg(long, global = true)]
    pub at: Option<String>,
    #[command(subcommand)]
    pub action: TimerAction,
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the next phase
    Start {
        /// Task the session belongs to
        #[arg(long)]
        task: Option<String>,
    },
    /// Pause the running phase
    Pause,
    /// Resume a paused phase
    Resume,
    /// Advance the timer and print its state
    Status,
    /// Abandon the current phase, recording it as interrupted
    Stop,
}

#[derive(Serialize)]
struct TimerReport<'a> {
    state: TimerState,
    phase: SessionType,
    remaining_secs: u64,
    progress: f64,
    task_id: Option<&'a str>,
    session_id: Option<&'a str>,
    events: Vec<TimerEvent>,
    /// Ids of sessions written to the session snapshot by this command
    recorded: Vec<String>,
}

fn load_tracker(path: &Path) -> Result<SessionTracker, Box<dyn std::error::Error>> {
    if path.exists() {
        let json = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&json)?);
    }
    let settings = Settings::read()?;
    Ok(SessionTracker::new(PomodoroTimer::from_settings(
        &settings.pomodoro,
    )))
}

fn save_tracker(path: &Path, tracker: &SessionTracker) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, serde_json::to_string_pretty(tracker)?)?;
    Ok(())
}

pub fn run(args: TimerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let state_path = match args.state {
        Some(path) => path,
        None => data_dir()?.join("timer.json"),
    };
    let sessions_path = match args.sessions {
        Some(path) => path,
        None => data_dir()?.join("sessions.json"),
    };
    let now: DateTime<Utc> = match args.at.as_deref() {
        Some(raw) => parse_instant(raw)?.with_timezone(&Utc),
        None => Utc::now(),
    };

    let mut tracker = load_tracker(&state_path)?;

    // Bring the timer up to date before applying the command, so a phase
    // that ran out in the meantime is recorded first.
    let mut update = tracker.tick(now)?;
    let command = match args.action {
        TimerAction::Start { task } => tracker.start(task, now)?,
        TimerAction::Pause => TrackerUpdate {
            event: tracker.pause(now),
            ..TrackerUpdate::default()
        },
        TimerAction::Resume => TrackerUpdate {
            event: tracker.resume(now),
            ..TrackerUpdate::default()
        },
        TimerAction::Status => TrackerUpdate::default(),
        TimerAction::Stop => tracker.stop(now)?,
    };
    update.closed.extend(command.closed);

    if !update.closed.is_empty() {
        append_sessions(&sessions_path, &update.closed)?;
    }
    save_tracker(&state_path, &tracker)?;
    tracing::debug!(
        state = ?tracker.timer().state(),
        recorded = update.closed.len(),
        "timer command applied"
    );

    let timer = tracker.timer();
    let report = TimerReport {
        state: timer.state(),
        phase: timer.phase(),
        remaining_secs: timer.remaining_secs(now),
        progress: timer.progress(now),
        task_id: tracker.task_id(),
        session_id: tracker.open_session().map(|s| s.id.as_str()),
        events: update.event.into_iter().chain(command.event).collect(),
        recorded: update.closed.iter().map(|s| s.id.clone()).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
