//! Prioritizer policy configuration.
//!
//! Callers pass a partial [`FilterConfig`]; it is resolved into a fully
//! populated [`ResolvedFilterConfig`] before the algorithm runs, so the
//! selection and scoring code never deals with missing values.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ANYTIME_TASKS: usize = 3;
pub const DEFAULT_EVENING_START_HOUR: u32 = 18;
pub const DEFAULT_OLD_TASK_DAYS_THRESHOLD: i64 = 7;
pub const DEFAULT_PRIORITIZE_SHORT_TASKS: bool = true;

/// Partial prioritizer configuration. Every field falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Upper bound on admitted `anytime` tasks (default 3)
    #[serde(default)]
    pub max_anytime_tasks: Option<usize>,
    /// Local hour at or after which evening rules engage (default 18)
    #[serde(default)]
    pub evening_start_hour: Option<u32>,
    /// Age in whole days at which a task counts as old (default 7)
    #[serde(default)]
    pub old_task_days_threshold: Option<i64>,
    /// Whether the evening short-task boost is active (default true)
    #[serde(default)]
    pub prioritize_short_tasks: Option<bool>,
    /// Reference instant (default: the moment of resolution)
    #[serde(default)]
    pub current_time: Option<DateTime<Local>>,
}

impl FilterConfig {
    pub fn with_current_time(mut self, at: DateTime<Local>) -> Self {
        self.current_time = Some(at);
        self
    }

    pub fn with_max_anytime_tasks(mut self, max: usize) -> Self {
        self.max_anytime_tasks = Some(max);
        self
    }

    /// Fill defaults, reading the local wall clock if no reference instant
    /// was supplied.
    pub fn resolve(&self) -> ResolvedFilterConfig {
        self.resolve_at(Local::now())
    }

    /// Fill defaults, using `now` when no reference instant was supplied.
    pub fn resolve_at(&self, now: DateTime<Local>) -> ResolvedFilterConfig {
        ResolvedFilterConfig {
            max_anytime_tasks: self.max_anytime_tasks.unwrap_or(DEFAULT_MAX_ANYTIME_TASKS),
            evening_start_hour: self
                .evening_start_hour
                .unwrap_or(DEFAULT_EVENING_START_HOUR),
            old_task_days_threshold: self
                .old_task_days_threshold
                .unwrap_or(DEFAULT_OLD_TASK_DAYS_THRESHOLD),
            prioritize_short_tasks: self
                .prioritize_short_tasks
                .unwrap_or(DEFAULT_PRIORITIZE_SHORT_TASKS),
            current_time: self.current_time.unwrap_or(now),
        }
    }

    /// Overlay `other` on top of `self`: fields set in `other` win.
    pub fn merged_with(&self, other: &FilterConfig) -> FilterConfig {
        FilterConfig {
            max_anytime_tasks: other.max_anytime_tasks.or(self.max_anytime_tasks),
            evening_start_hour: other.evening_start_hour.or(self.evening_start_hour),
            old_task_days_threshold: other
                .old_task_days_threshold
                .or(self.old_task_days_threshold),
            prioritize_short_tasks: other
                .prioritize_short_tasks
                .or(self.prioritize_short_tasks),
            current_time: other.current_time.or(self.current_time),
        }
    }
}

/// Fully specified prioritizer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilterConfig {
    pub max_anytime_tasks: usize,
    pub evening_start_hour: u32,
    pub old_task_days_threshold: i64,
    pub prioritize_short_tasks: bool,
    pub current_time: DateTime<Local>,
}

impl ResolvedFilterConfig {
    /// Default policy evaluated at `current_time`.
    pub fn at(current_time: DateTime<Local>) -> Self {
        FilterConfig::default().resolve_at(current_time)
    }
}
