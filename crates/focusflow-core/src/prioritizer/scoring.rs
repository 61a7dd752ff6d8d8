//! Priority scoring.
//!
//! A task's score is the sum of four parts:
//! - urgency tier: today 1000, this_week 500, anytime 100
//! - old-task boost: `age_days * 10` once `age_days >= old_task_days_threshold`
//! - evening short-task boost: +200 for estimates of at most 30 minutes
//! - age nudge: `age_days`, always applied
//!
//! Tier spacing keeps every tier above the next under the default policy
//! for realistic ages.

use chrono::{DateTime, Datelike, Local, Timelike, Utc, Weekday};

use super::config::ResolvedFilterConfig;
use crate::task::{Task, TimeSensitivity};

pub const TODAY_BASE_SCORE: i64 = 1000;
pub const THIS_WEEK_BASE_SCORE: i64 = 500;
pub const ANYTIME_BASE_SCORE: i64 = 100;
pub const OLD_TASK_DAY_MULTIPLIER: i64 = 10;
pub const EVENING_SHORT_TASK_BOOST: i64 = 200;
pub const SHORT_TASK_MAX_MINUTES: i64 = 30;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Saturday or Sunday in local time.
pub fn is_weekend(at: &DateTime<Local>) -> bool {
    matches!(at.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_evening(at: &DateTime<Local>, evening_start_hour: u32) -> bool {
    at.hour() >= evening_start_hour
}

/// Whole days between `created_at` and `now`, floored.
///
/// A `created_at` in the future yields a negative age; it is not clamped.
pub fn task_age_days(created_at: DateTime<Utc>, now: &DateTime<Local>) -> i64 {
    let elapsed = now.with_timezone(&Utc) - created_at;
    elapsed.num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

pub fn base_score(sensitivity: TimeSensitivity) -> i64 {
    match sensitivity {
        TimeSensitivity::Today => TODAY_BASE_SCORE,
        TimeSensitivity::ThisWeek => THIS_WEEK_BASE_SCORE,
        TimeSensitivity::Anytime => ANYTIME_BASE_SCORE,
        TimeSensitivity::Unrecognized => 0,
    }
}

/// Known, positive, and at most [`SHORT_TASK_MAX_MINUTES`]. Zero or negative
/// durations are malformed and never count as short.
fn is_short(task: &Task) -> bool {
    matches!(task.estimated_duration, Some(minutes) if minutes > 0 && minutes <= SHORT_TASK_MAX_MINUTES)
}

/// Per-part score breakdown, mainly for display and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub base: i64,
    pub old_task_boost: i64,
    pub evening_boost: i64,
    pub age_nudge: i64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i64 {
        self.base + self.old_task_boost + self.evening_boost + self.age_nudge
    }
}

pub fn score_breakdown(task: &Task, config: &ResolvedFilterConfig) -> ScoreBreakdown {
    let age_days = task_age_days(task.created_at, &config.current_time);

    let old_task_boost = if age_days >= config.old_task_days_threshold {
        age_days * OLD_TASK_DAY_MULTIPLIER
    } else {
        0
    };

    let evening_boost = if config.prioritize_short_tasks
        && is_evening(&config.current_time, config.evening_start_hour)
        && is_short(task)
    {
        EVENING_SHORT_TASK_BOOST
    } else {
        0
    };

    ScoreBreakdown {
        base: base_score(task.time_sensitivity),
        old_task_boost,
        evening_boost,
        age_nudge: age_days,
    }
}

/// Priority score; higher ranks first.
pub fn priority_score(task: &Task, config: &ResolvedFilterConfig) -> i64 {
    score_breakdown(task, config).total()
}
