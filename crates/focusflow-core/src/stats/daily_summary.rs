//! Daily summary: what got done on one calendar day (UTC).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::sessions::completion_rate;
use crate::pomodoro::{PomodoroSession, SessionType};
use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub tasks_created: u32,
    /// Tasks completed that day, whenever they were created
    pub tasks_completed: u32,
    /// Focused minutes from completed work sessions
    pub total_duration: u32,
    /// 0-100: share of the tasks created that day that were also completed
    /// that day
    pub completion_rate: u32,
    #[serde(default)]
    pub reflection_note: Option<String>,
    /// Ids of tasks completed that day, in completion order
    pub completed_task_ids: Vec<String>,
}

impl DailySummary {
    pub fn compute(date: NaiveDate, tasks: &[Task], sessions: &[PomodoroSession]) -> Self {
        let completed_on_day =
            |t: &Task| t.is_completed && t.completed_at.is_some_and(|at| at.date_naive() == date);

        let created: Vec<&Task> = tasks
            .iter()
            .filter(|t| t.created_at.date_naive() == date)
            .collect();
        let tasks_created = created.len() as u32;
        let created_and_completed = created.iter().filter(|&&t| completed_on_day(t)).count() as u32;

        let mut completed: Vec<&Task> = tasks.iter().filter(|&t| completed_on_day(t)).collect();
        completed.sort_by_key(|t| t.completed_at);

        let focused_secs: u64 = sessions
            .iter()
            .filter(|s| s.session_type == SessionType::Work && s.completed)
            .filter(|s| s.created_at.date_naive() == date)
            .map(|s| u64::from(s.duration))
            .sum();

        let tasks_completed = completed.len() as u32;
        Self {
            date,
            tasks_created,
            tasks_completed,
            total_duration: u32::try_from(focused_secs / 60).unwrap_or(u32::MAX),
            completion_rate: completion_rate(created_and_completed, tasks_created),
            reflection_note: None,
            completed_task_ids: completed.into_iter().map(|t| t.id.clone()).collect(),
        }
    }

    pub fn with_reflection_note(mut self, note: impl Into<String>) -> Self {
        self.reflection_note = Some(note.into());
        self
    }
}
