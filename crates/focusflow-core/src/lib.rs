//! # FocusFlow Core Library
//!
//! Business logic for the FocusFlow focus manager. The CLI binary is a thin
//! layer over this crate; task and session rows come from an external store
//! as snapshots.
//!
//! ## Architecture
//!
//! - **Prioritizer**: pure selection and ranking of the tasks to work on
//!   right now, given a task snapshot and a reference instant
//! - **Task**: task model, validation, and the defer action
//! - **Storage**: TOML settings and JSON snapshot files
//! - **Pomodoro**: session records and a wall-clock countdown timer
//! - **Stats**: per-day pomodoro aggregation and daily summaries
//!
//! ## Key Components
//!
//! - [`select_current_tasks`]: the current-task engine
//! - [`FilterConfig`]: partial prioritizer policy, resolved per call
//! - [`Settings`]: persisted user preferences
//! - [`PomodoroTimer`]: drift-free countdown

pub mod error;
pub mod pomodoro;
pub mod prioritizer;
pub mod stats;
pub mod storage;
pub mod task;

pub use error::{ConfigError, CoreError, ValidationError};
pub use pomodoro::{
    PomodoroSession, PomodoroTimer, SessionTracker, SessionType, TimerEvent, TimerState,
    TrackerUpdate,
};
pub use prioritizer::{
    current_tasks_scored, priority_score, select_current_tasks, select_current_tasks_with,
    FilterConfig, ResolvedFilterConfig, ScoredTask,
};
pub use stats::{aggregate_by_days, completion_rate, DailySummary, PeriodStats};
pub use storage::{CurrentViewSettings, PomodoroSettings, Settings};
pub use task::{CreateTaskInput, Task, TimeSensitivity, UpdateTaskInput};
