//! Settings persistence and JSON snapshot files.
//!
//! Tasks and pomodoro sessions are owned by an external store; callers hand
//! them over as JSON arrays (one object per row). Settings live in a TOML
//! file under the data directory.

mod settings;

pub use settings::{CurrentViewSettings, PomodoroSettings, Settings};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::pomodoro::PomodoroSession;
use crate::task::Task;

/// Returns `~/.config/focusflow[-dev]/` based on FOCUSFLOW_ENV.
///
/// Set FOCUSFLOW_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusflow-dev")
    } else {
        base_dir.join("focusflow")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)?;
    let rows: Vec<T> = serde_json::from_str(&content)?;
    debug!(path = %path.display(), rows = rows.len(), "read snapshot");
    Ok(rows)
}

fn write_json_array<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let content = serde_json::to_string_pretty(rows)?;
    std::fs::write(path, content)?;
    debug!(path = %path.display(), rows = rows.len(), "wrote snapshot");
    Ok(())
}

/// Read a task snapshot.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON task array.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    read_json_array(path)
}

/// Write a task snapshot.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    write_json_array(path, tasks)
}

/// Read a pomodoro session snapshot.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON session array.
pub fn load_sessions(path: &Path) -> Result<Vec<PomodoroSession>> {
    read_json_array(path)
}

/// Append sessions to a session snapshot, creating it if absent.
///
/// # Errors
///
/// Returns an error if an existing snapshot cannot be read or the file
/// cannot be written.
pub fn append_sessions(path: &Path, sessions: &[PomodoroSession]) -> Result<()> {
    let mut rows = if path.exists() {
        load_sessions(path)?
    } else {
        Vec::new()
    };
    rows.extend_from_slice(sessions);
    write_json_array(path, &rows)
}
