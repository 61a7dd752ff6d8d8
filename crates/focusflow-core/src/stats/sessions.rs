//! Pomodoro session aggregation by calendar day.
//!
//! Only work sessions count. A work session that did not complete counts as
//! interrupted; focused time sums the planned duration of completed work
//! sessions. Days are the UTC date of `created_at`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pomodoro::{PomodoroSession, SessionType};

/// Statistics for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBreakdown {
    pub date: NaiveDate,
    /// Completed work sessions
    pub completed: u32,
    /// Work sessions not completed
    pub interrupted: u32,
    /// Focused seconds (completed work sessions only)
    pub total_duration: u64,
    /// 0-100
    pub completion_rate: u32,
}

/// Totals over a period with a per-day breakdown (ascending by date).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub total_completed: u32,
    pub total_interrupted: u32,
    pub total_duration: u64,
    /// Completed sessions per active day, one decimal
    pub average_per_day: f64,
    pub daily_breakdown: Vec<DailyBreakdown>,
}

/// Percentage of `created` that got `completed`, rounded; 0 when nothing
/// was created.
pub fn completion_rate(completed: u32, created: u32) -> u32 {
    if created == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(created) * 100.0).round() as u32
}

/// Group sessions by day and total them.
pub fn aggregate_by_days(sessions: &[PomodoroSession]) -> PeriodStats {
    if sessions.is_empty() {
        return PeriodStats::default();
    }

    let mut by_day: BTreeMap<NaiveDate, Vec<&PomodoroSession>> = BTreeMap::new();
    for session in sessions {
        let date = session.created_at.date_naive();
        by_day.entry(date).or_default().push(session);
    }

    let daily_breakdown: Vec<DailyBreakdown> = by_day
        .into_iter()
        .map(|(date, day_sessions)| {
            let work: Vec<_> = day_sessions
                .into_iter()
                .filter(|s| s.session_type == SessionType::Work)
                .collect();
            let completed = work.iter().filter(|s| s.completed).count() as u32;
            let interrupted = work.len() as u32 - completed;
            let total_duration = work
                .iter()
                .filter(|s| s.completed)
                .map(|s| u64::from(s.duration))
                .sum();
            DailyBreakdown {
                date,
                completed,
                interrupted,
                total_duration,
                completion_rate: completion_rate(completed, work.len() as u32),
            }
        })
        .collect();

    let total_completed = daily_breakdown.iter().map(|d| d.completed).sum();
    let total_interrupted = daily_breakdown.iter().map(|d| d.interrupted).sum();
    let total_duration = daily_breakdown.iter().map(|d| d.total_duration).sum();
    let average_per_day = if daily_breakdown.is_empty() {
        0.0
    } else {
        (f64::from(total_completed) / daily_breakdown.len() as f64 * 10.0).round() / 10.0
    };

    PeriodStats {
        total_completed,
        total_interrupted,
        total_duration,
        average_per_day,
        daily_breakdown,
    }
}

/// Aggregate only sessions created between `from` and `to`, inclusive.
pub fn aggregate_range(sessions: &[PomodoroSession], from: NaiveDate, to: NaiveDate) -> PeriodStats {
    let in_range: Vec<PomodoroSession> = sessions
        .iter()
        .filter(|s| {
            let date = s.created_at.date_naive();
            date >= from && date <= to
        })
        .cloned()
        .collect();
    aggregate_by_days(&in_range)
}
