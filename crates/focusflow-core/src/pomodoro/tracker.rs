//! A timer paired with the session record it is filling in.
//!
//! The CLI is one process per command, so the tracker is serialized between
//! invocations. Every command that closes a session hands it back in
//! [`TrackerUpdate::closed`] for the caller to record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::PomodoroSession;
use super::timer::{PomodoroTimer, TimerEvent};
use crate::error::ValidationError;

/// Result of a tracker command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerUpdate {
    pub event: Option<TimerEvent>,
    /// Sessions closed by the command, in closing order
    pub closed: Vec<PomodoroSession>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTracker {
    timer: PomodoroTimer,
    #[serde(default)]
    task_id: Option<String>,
    #[serde(default)]
    open: Option<PomodoroSession>,
}

impl SessionTracker {
    pub fn new(timer: PomodoroTimer) -> Self {
        Self {
            timer,
            task_id: None,
            open: None,
        }
    }

    pub fn timer(&self) -> &PomodoroTimer {
        &self.timer
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn open_session(&self) -> Option<&PomodoroSession> {
        self.open.as_ref()
    }

    /// Start the next phase and open its session. `task_id` replaces the
    /// tracked task when given. Does nothing while a phase is running or
    /// paused.
    ///
    /// # Errors
    ///
    /// Returns an error if the phase is longer than a session may be; the
    /// timer is reset in that case.
    pub fn start(
        &mut self,
        task_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<TrackerUpdate, ValidationError> {
        let Some(event) = self.timer.start(now) else {
            return Ok(TrackerUpdate::default());
        };
        if task_id.is_some() {
            self.task_id = task_id;
        }
        if let Err(e) = self.open_phase(now) {
            self.timer.reset(now);
            return Err(e);
        }
        Ok(TrackerUpdate {
            event: Some(event),
            closed: Vec::new(),
        })
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        self.timer.pause(now)
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        self.timer.resume(now)
    }

    /// Advance the timer. A finished phase closes its session as completed,
    /// and an automatically started rest phase opens a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the follow-up session cannot be opened.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<TrackerUpdate, ValidationError> {
        let Some(event) = self.timer.tick(now) else {
            return Ok(TrackerUpdate::default());
        };

        let mut closed = Vec::new();
        if let Some(mut session) = self.open.take() {
            session.complete(now)?;
            closed.push(session);
        }
        if matches!(event, TimerEvent::PhaseCompleted { next_started: Some(_), .. }) {
            self.open_phase(now)?;
        }
        Ok(TrackerUpdate {
            event: Some(event),
            closed,
        })
    }

    /// Abandon the current phase. An open session is closed as interrupted
    /// and the timer goes back to an idle work phase.
    ///
    /// # Errors
    ///
    /// Returns an error if the open session was already closed.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<TrackerUpdate, ValidationError> {
        let event = self.timer.reset(now);
        let mut closed = Vec::new();
        if let Some(mut session) = self.open.take() {
            session.cancel(now)?;
            closed.push(session);
        }
        self.task_id = None;
        Ok(TrackerUpdate { event, closed })
    }

    fn open_phase(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let secs = u32::try_from(self.timer.phase_duration_secs()).unwrap_or(u32::MAX);
        let session = PomodoroSession::start(self.task_id.clone(), self.timer.phase(), secs, now)?;
        self.open = Some(session);
        Ok(())
    }
}
