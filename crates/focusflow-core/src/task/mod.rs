//! Task model.
//!
//! A task carries a three-level urgency classification (`today`,
//! `this_week`, `anytime`) and an optional duration estimate. The
//! prioritizer only reads tasks; mutation happens through explicit user
//! actions ([`Task::apply_update`], [`Task::defer`], [`Task::set_completed`]).

mod input;

pub use input::{CreateTaskInput, UpdateTaskInput};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Urgency classification of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimeSensitivity {
    /// Must be done today
    Today,
    /// Should be done some time this week
    ThisWeek,
    /// No particular deadline
    Anytime,
    /// Any other value read from a snapshot. Never produced by validated
    /// input; the prioritizer places it in no bucket.
    #[serde(other)]
    Unrecognized,
}

impl TimeSensitivity {
    /// The next lower urgency level, or `None` when already at `anytime`.
    ///
    /// ```text
    /// today -> this_week -> anytime -> (none)
    /// ```
    pub fn deferred(self) -> Option<TimeSensitivity> {
        match self {
            TimeSensitivity::Today => Some(TimeSensitivity::ThisWeek),
            TimeSensitivity::ThisWeek => Some(TimeSensitivity::Anytime),
            TimeSensitivity::Anytime | TimeSensitivity::Unrecognized => None,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, TimeSensitivity::Unrecognized)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeSensitivity::Today => "today",
            TimeSensitivity::ThisWeek => "this_week",
            TimeSensitivity::Anytime => "anytime",
            TimeSensitivity::Unrecognized => "unrecognized",
        }
    }
}

impl Default for TimeSensitivity {
    fn default() -> Self {
        TimeSensitivity::Today
    }
}

impl fmt::Display for TimeSensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeSensitivity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(TimeSensitivity::Today),
            "this_week" => Ok(TimeSensitivity::ThisWeek),
            "anytime" => Ok(TimeSensitivity::Anytime),
            other => Err(ValidationError::InvalidValue {
                field: "time_sensitivity".into(),
                message: format!("expected today, this_week or anytime, got '{other}'"),
            }),
        }
    }
}

/// A user task, as stored in a task snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Owning user, when the snapshot came from a multi-user store
    #[serde(default)]
    pub user_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_completed: bool,
    pub time_sensitivity: TimeSensitivity,
    /// Estimated duration in minutes; `None` means unknown. Read as a signed
    /// integer so a malformed row still loads and fails [`Task::validate`].
    #[serde(default)]
    pub estimated_duration: Option<i64>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a new, uncompleted task from validated input.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found in `input`.
    pub fn create(input: CreateTaskInput, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        input.validate()?;
        Ok(Task {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: None,
            title: input.title.trim().to_string(),
            description: input.description,
            is_completed: false,
            time_sensitivity: input.time_sensitivity,
            estimated_duration: input.estimated_duration.map(i64::from),
            completed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update.
    ///
    /// Flipping `is_completed` sets or clears `completed_at`. The task is
    /// left untouched when validation fails.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found in `update`.
    pub fn apply_update(
        &mut self,
        update: UpdateTaskInput,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        update.validate()?;

        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(sensitivity) = update.time_sensitivity {
            self.time_sensitivity = sensitivity;
        }
        if let Some(duration) = update.estimated_duration {
            self.estimated_duration = duration.map(i64::from);
        }
        if let Some(completed) = update.is_completed {
            self.set_completed(completed, now);
        }

        self.updated_at = now;
        Ok(())
    }

    /// Mark the task completed or reopen it.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        if completed == self.is_completed {
            return;
        }
        self.is_completed = completed;
        self.completed_at = if completed { Some(now) } else { None };
        self.updated_at = now;
    }

    /// Lower the task's urgency by one level.
    ///
    /// Returns `false` when the task is already `anytime` and nothing changed.
    pub fn defer(&mut self, now: DateTime<Utc>) -> bool {
        match self.time_sensitivity.deferred() {
            Some(next) => {
                self.time_sensitivity = next;
                self.updated_at = now;
                true
            }
            None => false,
        }
    }

    /// Check the invariants a stored task must satisfy.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        input::validate_title(&self.title)?;
        input::validate_description(self.description.as_deref())?;
        input::validate_time_sensitivity(self.time_sensitivity)?;
        input::validate_duration(self.estimated_duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap()
    }

    fn new_task(sensitivity: TimeSensitivity) -> Task {
        Task::create(
            CreateTaskInput {
                title: "Write report".into(),
                description: None,
                time_sensitivity: sensitivity,
                estimated_duration: Some(45),
            },
            now(),
        )
        .unwrap()
    }

    #[test]
    fn create_sets_defaults() {
        let task = new_task(TimeSensitivity::Today);
        assert!(!task.is_completed);
        assert_eq!(task.created_at, now());
        assert_eq!(task.updated_at, now());
        assert!(task.completed_at.is_none());
        assert!(uuid::Uuid::parse_str(&task.id).is_ok());
    }

    #[test]
    fn create_trims_title() {
        let task = Task::create(
            CreateTaskInput {
                title: "  padded  ".into(),
                ..CreateTaskInput::default()
            },
            now(),
        )
        .unwrap();
        assert_eq!(task.title, "padded");
    }

    #[test]
    fn create_rejects_invalid_input() {
        let err = Task::create(
            CreateTaskInput {
                title: "   ".into(),
                ..CreateTaskInput::default()
            },
            now(),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
    }

    #[test]
    fn defer_walks_down_one_level() {
        let later = now() + chrono::Duration::hours(1);
        let mut task = new_task(TimeSensitivity::Today);

        assert!(task.defer(later));
        assert_eq!(task.time_sensitivity, TimeSensitivity::ThisWeek);
        assert!(task.defer(later));
        assert_eq!(task.time_sensitivity, TimeSensitivity::Anytime);
        assert!(!task.defer(later));
        assert_eq!(task.time_sensitivity, TimeSensitivity::Anytime);
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn completion_sets_and_clears_timestamp() {
        let mut task = new_task(TimeSensitivity::Today);
        let done_at = now() + chrono::Duration::minutes(30);

        task.apply_update(
            UpdateTaskInput {
                is_completed: Some(true),
                ..UpdateTaskInput::default()
            },
            done_at,
        )
        .unwrap();
        assert!(task.is_completed);
        assert_eq!(task.completed_at, Some(done_at));

        task.set_completed(false, done_at);
        assert!(!task.is_completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn failed_update_leaves_task_unchanged() {
        let mut task = new_task(TimeSensitivity::Today);
        let before = task.clone();
        let result = task.apply_update(
            UpdateTaskInput {
                title: Some("New title".into()),
                estimated_duration: Some(Some(0)),
                ..UpdateTaskInput::default()
            },
            now(),
        );
        assert!(result.is_err());
        assert_eq!(task, before);
    }

    #[test]
    fn update_can_clear_duration() {
        let mut task = new_task(TimeSensitivity::Today);
        task.apply_update(
            UpdateTaskInput {
                estimated_duration: Some(None),
                ..UpdateTaskInput::default()
            },
            now(),
        )
        .unwrap();
        assert_eq!(task.estimated_duration, None);
    }

    #[test]
    fn snapshot_json_uses_row_field_names() {
        let json = r#"{
            "id": "a",
            "user_id": "u",
            "title": "Call bank",
            "description": null,
            "is_completed": false,
            "time_sensitivity": "this_week",
            "estimated_duration": 15,
            "completed_at": null,
            "created_at": "2024-01-01T10:00:00Z",
            "updated_at": "2024-01-01T10:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.time_sensitivity, TimeSensitivity::ThisWeek);
        assert_eq!(task.estimated_duration, Some(15));
        assert!(task.validate().is_ok());
    }

    #[test]
    fn negative_duration_is_read_but_fails_validation() {
        let json = r#"{
            "id": "a",
            "title": "Odd",
            "is_completed": false,
            "time_sensitivity": "today",
            "estimated_duration": -5,
            "created_at": "2024-01-01T10:00:00Z",
            "updated_at": "2024-01-01T10:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.estimated_duration, Some(-5));
        assert!(matches!(
            task.validate(),
            Err(ValidationError::OutOfRange { field: "estimated_duration", value: -5, .. })
        ));
    }

    #[test]
    fn unknown_sensitivity_is_read_but_fails_validation() {
        let json = r#"{
            "id": "a",
            "title": "Odd",
            "is_completed": false,
            "time_sensitivity": "next_month",
            "created_at": "2024-01-01T10:00:00Z",
            "updated_at": "2024-01-01T10:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.time_sensitivity, TimeSensitivity::Unrecognized);
        assert!(task.validate().is_err());
    }

    #[test]
    fn sensitivity_parses_from_str() {
        assert_eq!("today".parse::<TimeSensitivity>().unwrap(), TimeSensitivity::Today);
        assert_eq!(
            "this_week".parse::<TimeSensitivity>().unwrap(),
            TimeSensitivity::ThisWeek
        );
        assert!("someday".parse::<TimeSensitivity>().is_err());
    }
}
