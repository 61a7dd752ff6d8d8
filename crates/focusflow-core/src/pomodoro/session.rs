//! Recorded pomodoro sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Two hours.
pub const MAX_SESSION_SECS: u32 = 7200;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Work,
    Rest,
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionType::Work => f.write_str("work"),
            SessionType::Rest => f.write_str("rest"),
        }
    }
}

/// One work or rest session. `duration` is the planned length in seconds.
///
/// A session with an `end_time` and `completed = false` was cancelled
/// (interrupted).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PomodoroSession {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    pub session_type: SessionType,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub duration: u32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl PomodoroSession {
    /// Open a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if `duration_secs` exceeds two hours.
    pub fn start(
        task_id: Option<String>,
        session_type: SessionType,
        duration_secs: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if duration_secs > MAX_SESSION_SECS {
            return Err(ValidationError::OutOfRange {
                field: "duration",
                min: 0,
                max: i64::from(MAX_SESSION_SECS),
                value: i64::from(duration_secs),
            });
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: None,
            task_id,
            session_type,
            start_time: now,
            end_time: None,
            duration: duration_secs,
            completed: false,
            created_at: now,
        })
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Close the session as completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session was already closed.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.close(now, true)
    }

    /// Close the session as interrupted.
    ///
    /// # Errors
    ///
    /// Returns an error if the session was already closed.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.close(now, false)
    }

    fn close(&mut self, now: DateTime<Utc>, completed: bool) -> Result<(), ValidationError> {
        if !self.is_open() {
            return Err(ValidationError::InvalidValue {
                field: "end_time".into(),
                message: format!("session {} is already closed", self.id),
            });
        }
        self.end_time = Some(now);
        self.completed = completed;
        Ok(())
    }
}
