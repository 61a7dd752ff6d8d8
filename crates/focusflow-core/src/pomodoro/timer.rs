//! Pomodoro countdown.
//!
//! The timer is a wall-clock state machine. It does not count ticks: every
//! query recomputes elapsed time from the instant the phase was (re)started,
//! so late or skipped ticks never cause drift. The caller supplies `now` to
//! every command and calls `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!        Finished -> (start) Running
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::SessionType;
use crate::storage::PomodoroSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Every timer state change produces an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimerEvent {
    PhaseStarted {
        phase: SessionType,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    Paused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase ran to zero. `next_started` is set when a rest phase was
    /// started automatically.
    PhaseCompleted {
        phase: SessionType,
        next_started: Option<SessionType>,
        at: DateTime<Utc>,
    },
    Reset {
        at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroTimer {
    work_secs: u64,
    rest_secs: u64,
    auto_start_rest: bool,
    phase: SessionType,
    state: TimerState,
    /// Instant the running phase started, rebased on resume so that
    /// `now - started_at` is always the phase's elapsed time.
    started_at: Option<DateTime<Utc>>,
    /// Elapsed seconds frozen at pause.
    paused_elapsed_secs: u64,
}

impl PomodoroTimer {
    pub fn new(work_minutes: u32, rest_minutes: u32, auto_start_rest: bool) -> Self {
        Self {
            work_secs: u64::from(work_minutes) * 60,
            rest_secs: u64::from(rest_minutes) * 60,
            auto_start_rest,
            phase: SessionType::Work,
            state: TimerState::Idle,
            started_at: None,
            paused_elapsed_secs: 0,
        }
    }

    pub fn from_settings(settings: &PomodoroSettings) -> Self {
        Self::new(
            settings.work_duration,
            settings.rest_duration,
            settings.auto_start_rest,
        )
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> SessionType {
        self.phase
    }

    pub fn phase_duration_secs(&self) -> u64 {
        match self.phase {
            SessionType::Work => self.work_secs,
            SessionType::Rest => self.rest_secs,
        }
    }

    /// Whole seconds elapsed in the current phase.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        match self.state {
            TimerState::Idle => 0,
            TimerState::Paused => self.paused_elapsed_secs,
            TimerState::Finished => self.phase_duration_secs(),
            TimerState::Running => self
                .started_at
                .map(|start| {
                    let secs = (now - start).num_seconds();
                    u64::try_from(secs).unwrap_or(0)
                })
                .unwrap_or(0)
                .min(self.phase_duration_secs()),
        }
    }

    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u64 {
        self.phase_duration_secs()
            .saturating_sub(self.elapsed_secs(now))
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        let total = self.phase_duration_secs();
        if total == 0 {
            return 0.0;
        }
        self.elapsed_secs(now) as f64 / total as f64
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the current phase from the top. From `Finished`, a completed
    /// work phase is followed by rest and vice versa.
    pub fn start(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        match self.state {
            TimerState::Idle => Some(self.begin(self.phase, now)),
            TimerState::Finished => {
                let next = match self.phase {
                    SessionType::Work => SessionType::Rest,
                    SessionType::Rest => SessionType::Work,
                };
                Some(self.begin(next, now))
            }
            TimerState::Running | TimerState::Paused => None,
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        self.paused_elapsed_secs = self.elapsed_secs(now);
        self.state = TimerState::Paused;
        self.started_at = None;
        Some(TimerEvent::Paused {
            remaining_secs: self.remaining_secs(now),
            at: now,
        })
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        if self.state != TimerState::Paused {
            return None;
        }
        let elapsed = i64::try_from(self.paused_elapsed_secs).unwrap_or(i64::MAX);
        self.started_at = Some(now - chrono::Duration::seconds(elapsed));
        self.state = TimerState::Running;
        Some(TimerEvent::Resumed {
            remaining_secs: self.remaining_secs(now),
            at: now,
        })
    }

    /// Back to an idle work phase.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        self.phase = SessionType::Work;
        self.state = TimerState::Idle;
        self.started_at = None;
        self.paused_elapsed_secs = 0;
        Some(TimerEvent::Reset { at: now })
    }

    /// Call periodically. Returns `Some(TimerEvent::PhaseCompleted)` when
    /// the running phase reaches zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        if self.state != TimerState::Running || self.remaining_secs(now) > 0 {
            return None;
        }

        let finished = self.phase;
        let next_started = if finished == SessionType::Work && self.auto_start_rest {
            self.begin(SessionType::Rest, now);
            Some(SessionType::Rest)
        } else {
            self.state = TimerState::Finished;
            self.started_at = None;
            None
        };

        Some(TimerEvent::PhaseCompleted {
            phase: finished,
            next_started,
            at: now,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin(&mut self, phase: SessionType, now: DateTime<Utc>) -> TimerEvent {
        self.phase = phase;
        self.state = TimerState::Running;
        self.started_at = Some(now);
        self.paused_elapsed_secs = 0;
        TimerEvent::PhaseStarted {
            phase,
            duration_secs: self.phase_duration_secs(),
            at: now,
        }
    }
}
