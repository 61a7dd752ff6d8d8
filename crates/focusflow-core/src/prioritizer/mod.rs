//! Current-task selection ("what should I work on right now").
//!
//! Pipeline, evaluated against a single reference instant:
//!
//! ```text
//! tasks ─> drop completed ─> split by sensitivity ─> admit buckets ─> score ─> stable sort
//!                            today / this_week / anytime
//! ```
//!
//! Admission rules:
//! - every `today` task is admitted
//! - `this_week` tasks are admitted on Saturday/Sunday, or when there is no
//!   `today` task; the two conditions are independent
//! - `anytime` tasks are admitted up to `max_anytime_tasks`, taking a prefix
//!   in input order (before scoring)
//!
//! Candidates enter scoring as `today ++ this_week ++ anytime`; the sort is
//! stable, so equal scores keep that order. The engine never mutates a task
//! and never reads the clock itself; see [`FilterConfig::resolve`].

mod config;
mod scoring;

pub use config::{
    FilterConfig, ResolvedFilterConfig, DEFAULT_EVENING_START_HOUR, DEFAULT_MAX_ANYTIME_TASKS,
    DEFAULT_OLD_TASK_DAYS_THRESHOLD, DEFAULT_PRIORITIZE_SHORT_TASKS,
};
pub use scoring::{
    base_score, is_evening, is_weekend, priority_score, score_breakdown, task_age_days,
    ScoreBreakdown, ANYTIME_BASE_SCORE, EVENING_SHORT_TASK_BOOST, OLD_TASK_DAY_MULTIPLIER,
    SHORT_TASK_MAX_MINUTES, THIS_WEEK_BASE_SCORE, TODAY_BASE_SCORE,
};

use serde::Serialize;
use tracing::debug;

use crate::task::{Task, TimeSensitivity};

/// A selected task together with its priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoredTask<'a> {
    pub task: &'a Task,
    pub score: i64,
}

/// Select and order the currently actionable tasks.
///
/// Resolves `config` first (reading the local clock only if no
/// `current_time` was given).
pub fn select_current_tasks<'a>(tasks: &'a [Task], config: &FilterConfig) -> Vec<&'a Task> {
    select_current_tasks_with(tasks, &config.resolve())
}

/// Select and order the currently actionable tasks under a resolved policy.
pub fn select_current_tasks_with<'a>(
    tasks: &'a [Task],
    config: &ResolvedFilterConfig,
) -> Vec<&'a Task> {
    current_tasks_scored(tasks, config)
        .into_iter()
        .map(|scored| scored.task)
        .collect()
}

/// Same as [`select_current_tasks_with`], keeping each task's score.
pub fn current_tasks_scored<'a>(
    tasks: &'a [Task],
    config: &ResolvedFilterConfig,
) -> Vec<ScoredTask<'a>> {
    let mut today = Vec::new();
    let mut this_week = Vec::new();
    let mut anytime = Vec::new();
    let mut open = 0usize;

    for task in tasks.iter().filter(|t| !t.is_completed) {
        open += 1;
        match task.time_sensitivity {
            TimeSensitivity::Today => today.push(task),
            TimeSensitivity::ThisWeek => this_week.push(task),
            TimeSensitivity::Anytime => anytime.push(task),
            TimeSensitivity::Unrecognized => {
                debug!(task_id = %task.id, "task has no recognised time sensitivity; skipped");
            }
        }
    }

    if open == 0 {
        return Vec::new();
    }

    let weekend = is_weekend(&config.current_time);
    let include_this_week = weekend || today.is_empty();
    let anytime_limit = config.max_anytime_tasks.min(anytime.len());

    debug!(
        open,
        today = today.len(),
        this_week = this_week.len(),
        anytime = anytime.len(),
        weekend,
        include_this_week,
        anytime_limit,
        "selecting current tasks"
    );

    let mut candidates: Vec<&Task> = today;
    if include_this_week {
        candidates.extend(this_week);
    }
    candidates.extend(anytime.into_iter().take(anytime_limit));

    let mut scored: Vec<ScoredTask<'a>> = candidates
        .into_iter()
        .map(|task| ScoredTask {
            task,
            score: priority_score(task, config),
        })
        .collect();

    // `sort_by` is stable: ties keep bucket-then-input order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};
    use std::time::Instant;

    struct TaskBuilder {
        task: Task,
    }

    impl TaskBuilder {
        fn new(id: &str, sensitivity: TimeSensitivity, now: DateTime<Local>) -> Self {
            let created = now.with_timezone(&Utc);
            Self {
                task: Task {
                    id: id.into(),
                    user_id: Some("test-user".into()),
                    title: id.into(),
                    description: None,
                    is_completed: false,
                    time_sensitivity: sensitivity,
                    estimated_duration: None,
                    completed_at: None,
                    created_at: created,
                    updated_at: created,
                },
            }
        }

        fn completed(mut self) -> Self {
            self.task.is_completed = true;
            self
        }

        fn minutes(mut self, minutes: i64) -> Self {
            self.task.estimated_duration = Some(minutes);
            self
        }

        fn created(mut self, at: DateTime<Local>) -> Self {
            self.task.created_at = at.with_timezone(&Utc);
            self
        }

        fn build(self) -> Task {
            self.task
        }
    }

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn monday() -> DateTime<Local> {
        local(2024, 1, 8, 10)
    }

    fn saturday() -> DateTime<Local> {
        local(2024, 1, 6, 10)
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    fn select(tasks: &[Task], at: DateTime<Local>) -> Vec<String> {
        ids(&select_current_tasks_with(tasks, &ResolvedFilterConfig::at(at)))
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(select_current_tasks(&[], &FilterConfig::default()).is_empty());
    }

    #[test]
    fn all_completed_gives_empty_output() {
        let tasks = vec![
            TaskBuilder::new("a", TimeSensitivity::Today, monday()).completed().build(),
            TaskBuilder::new("b", TimeSensitivity::Anytime, monday()).completed().build(),
        ];
        assert!(select(&tasks, monday()).is_empty());
    }

    #[test]
    fn completed_tasks_are_excluded() {
        let tasks = vec![
            TaskBuilder::new("active", TimeSensitivity::Today, monday()).build(),
            TaskBuilder::new("done", TimeSensitivity::Today, monday()).completed().build(),
        ];
        assert_eq!(select(&tasks, monday()), vec!["active"]);
    }

    #[test]
    fn today_tasks_rank_first() {
        let tasks = vec![
            TaskBuilder::new("anytime", TimeSensitivity::Anytime, saturday()).build(),
            TaskBuilder::new("today", TimeSensitivity::Today, saturday()).build(),
            TaskBuilder::new("week", TimeSensitivity::ThisWeek, saturday()).build(),
        ];
        assert_eq!(select(&tasks, saturday()), vec!["today", "week", "anytime"]);
    }

    #[test]
    fn all_today_tasks_are_included() {
        let tasks = vec![
            TaskBuilder::new("t1", TimeSensitivity::Today, monday()).build(),
            TaskBuilder::new("t2", TimeSensitivity::Today, monday()).build(),
            TaskBuilder::new("t3", TimeSensitivity::Today, monday()).build(),
            TaskBuilder::new("any", TimeSensitivity::Anytime, monday()).build(),
        ];
        assert_eq!(select(&tasks, monday()), vec!["t1", "t2", "t3", "any"]);
    }

    #[test]
    fn scenario_a_today_then_anytime_on_weekday() {
        let now = monday();
        let tasks = vec![
            TaskBuilder::new("today1", TimeSensitivity::Today, now)
                .created(now - Duration::hours(1))
                .build(),
            TaskBuilder::new("any1", TimeSensitivity::Anytime, now).build(),
            TaskBuilder::new("any2", TimeSensitivity::Anytime, now).build(),
        ];
        assert_eq!(select(&tasks, now), vec!["today1", "any1", "any2"]);
    }

    #[test]
    fn scenario_b_anytime_prefix_is_taken_in_input_order() {
        let tasks: Vec<Task> = (1..=5)
            .map(|i| TaskBuilder::new(&format!("any{i}"), TimeSensitivity::Anytime, monday()).build())
            .collect();
        let cfg = FilterConfig::default()
            .with_max_anytime_tasks(3)
            .resolve_at(monday());
        let selected = select_current_tasks_with(&tasks, &cfg);
        assert_eq!(ids(&selected), vec!["any1", "any2", "any3"]);
    }

    #[test]
    fn anytime_truncation_happens_before_scoring() {
        // The old task sits past the limit, so it is never a candidate.
        let now = monday();
        let mut tasks: Vec<Task> = (1..=3)
            .map(|i| TaskBuilder::new(&format!("any{i}"), TimeSensitivity::Anytime, now).build())
            .collect();
        tasks.push(
            TaskBuilder::new("old", TimeSensitivity::Anytime, now)
                .created(now - Duration::days(30))
                .build(),
        );
        assert_eq!(select(&tasks, now), vec!["any1", "any2", "any3"]);
    }

    #[test]
    fn scenario_c_weekday_suppresses_this_week() {
        let tasks = vec![
            TaskBuilder::new("today", TimeSensitivity::Today, monday()).build(),
            TaskBuilder::new("week", TimeSensitivity::ThisWeek, monday()).build(),
        ];
        assert_eq!(select(&tasks, monday()), vec!["today"]);
    }

    #[test]
    fn scenario_d_weekend_includes_this_week() {
        let tasks = vec![
            TaskBuilder::new("week", TimeSensitivity::ThisWeek, saturday()).build(),
            TaskBuilder::new("today", TimeSensitivity::Today, saturday()).build(),
        ];
        assert_eq!(select(&tasks, saturday()), vec!["today", "week"]);
    }

    #[test]
    fn sunday_counts_as_weekend() {
        let sunday = local(2024, 1, 7, 10);
        let tasks = vec![
            TaskBuilder::new("today", TimeSensitivity::Today, sunday).build(),
            TaskBuilder::new("week", TimeSensitivity::ThisWeek, sunday).build(),
        ];
        assert_eq!(select(&tasks, sunday), vec!["today", "week"]);
    }

    #[test]
    fn this_week_included_when_no_today_tasks() {
        let tasks = vec![
            TaskBuilder::new("week1", TimeSensitivity::ThisWeek, monday()).build(),
            TaskBuilder::new("week2", TimeSensitivity::ThisWeek, monday()).build(),
            TaskBuilder::new("any", TimeSensitivity::Anytime, monday()).build(),
        ];
        assert_eq!(select(&tasks, monday()), vec!["week1", "week2", "any"]);
    }

    #[test]
    fn completed_today_task_does_not_suppress_this_week() {
        let tasks = vec![
            TaskBuilder::new("done", TimeSensitivity::Today, monday()).completed().build(),
            TaskBuilder::new("week", TimeSensitivity::ThisWeek, monday()).build(),
        ];
        assert_eq!(select(&tasks, monday()), vec!["week"]);
    }

    #[test]
    fn evening_prefers_short_tasks() {
        let evening = local(2024, 1, 1, 19);
        let tasks = vec![
            TaskBuilder::new("long", TimeSensitivity::Today, evening).minutes(120).build(),
            TaskBuilder::new("short", TimeSensitivity::Today, evening).minutes(15).build(),
        ];
        assert_eq!(select(&tasks, evening), vec!["short", "long"]);
    }

    #[test]
    fn evening_preference_off_keeps_input_order() {
        let evening = local(2024, 1, 1, 19);
        let tasks = vec![
            TaskBuilder::new("long", TimeSensitivity::Today, evening).minutes(120).build(),
            TaskBuilder::new("short", TimeSensitivity::Today, evening).minutes(15).build(),
        ];
        let cfg = FilterConfig {
            prioritize_short_tasks: Some(false),
            ..FilterConfig::default()
        }
        .resolve_at(evening);
        assert_eq!(ids(&select_current_tasks_with(&tasks, &cfg)), vec!["long", "short"]);
    }

    #[test]
    fn unknown_duration_in_evening_is_not_boosted() {
        let evening = local(2024, 1, 1, 20);
        let tasks = vec![
            TaskBuilder::new("unknown", TimeSensitivity::Today, evening).build(),
            TaskBuilder::new("thirty", TimeSensitivity::Today, evening).minutes(30).build(),
        ];
        assert_eq!(select(&tasks, evening), vec!["thirty", "unknown"]);
    }

    #[test]
    fn old_tasks_are_boosted() {
        let now = local(2024, 1, 15, 10);
        let tasks = vec![
            TaskBuilder::new("recent", TimeSensitivity::Anytime, now)
                .created(local(2024, 1, 14, 10))
                .build(),
            TaskBuilder::new("old", TimeSensitivity::Anytime, now)
                .created(local(2024, 1, 1, 10))
                .build(),
        ];
        assert_eq!(select(&tasks, now), vec!["old", "recent"]);
    }

    #[test]
    fn multiple_factors_combine() {
        let now = local(2024, 1, 15, 20);
        let tasks = vec![
            TaskBuilder::new("recent-long", TimeSensitivity::Today, now).minutes(120).build(),
            TaskBuilder::new("old-short", TimeSensitivity::Today, now)
                .created(local(2024, 1, 1, 10))
                .minutes(20)
                .build(),
        ];
        assert_eq!(select(&tasks, now), vec!["old-short", "recent-long"]);
    }

    #[test]
    fn equal_scores_keep_bucket_then_input_order() {
        let tasks = vec![
            TaskBuilder::new("t3", TimeSensitivity::Today, monday()).build(),
            TaskBuilder::new("t1", TimeSensitivity::Today, monday()).build(),
            TaskBuilder::new("t2", TimeSensitivity::Today, monday()).build(),
        ];
        assert_eq!(select(&tasks, monday()), vec!["t3", "t1", "t2"]);
    }

    #[test]
    fn zero_anytime_limit_drops_all_anytime() {
        let tasks = vec![
            TaskBuilder::new("today", TimeSensitivity::Today, monday()).build(),
            TaskBuilder::new("any", TimeSensitivity::Anytime, monday()).build(),
        ];
        let cfg = FilterConfig::default()
            .with_max_anytime_tasks(0)
            .resolve_at(monday());
        assert_eq!(ids(&select_current_tasks_with(&tasks, &cfg)), vec!["today"]);
    }

    #[test]
    fn custom_anytime_limit() {
        let tasks: Vec<Task> = (0..10)
            .map(|i| TaskBuilder::new(&format!("a{i}"), TimeSensitivity::Anytime, monday()).build())
            .collect();
        let cfg = FilterConfig::default()
            .with_max_anytime_tasks(5)
            .resolve_at(monday());
        assert_eq!(select_current_tasks_with(&tasks, &cfg).len(), 5);
    }

    #[test]
    fn unrecognized_sensitivity_is_silently_dropped() {
        let mut odd = TaskBuilder::new("odd", TimeSensitivity::Today, monday()).build();
        odd.time_sensitivity = TimeSensitivity::Unrecognized;
        let tasks = vec![odd, TaskBuilder::new("any", TimeSensitivity::Anytime, monday()).build()];
        assert_eq!(select(&tasks, monday()), vec!["any"]);

        let only_odd = vec![tasks[0].clone()];
        assert!(select(&only_odd, monday()).is_empty());
    }

    #[test]
    fn input_is_not_mutated() {
        let tasks = vec![
            TaskBuilder::new("week", TimeSensitivity::ThisWeek, saturday()).build(),
            TaskBuilder::new("today", TimeSensitivity::Today, saturday()).minutes(10).build(),
        ];
        let before = tasks.clone();
        let _ = select(&tasks, saturday());
        assert_eq!(tasks, before);
    }

    #[test]
    fn scored_output_is_descending() {
        let now = local(2024, 1, 13, 19);
        let tasks = vec![
            TaskBuilder::new("any", TimeSensitivity::Anytime, now).minutes(10).build(),
            TaskBuilder::new("week", TimeSensitivity::ThisWeek, now).build(),
            TaskBuilder::new("today", TimeSensitivity::Today, now).minutes(60).build(),
        ];
        let scored = current_tasks_scored(&tasks, &ResolvedFilterConfig::at(now));
        let scores: Vec<i64> = scored.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![1000, 500, 300]);
    }

    #[test]
    fn thousand_tasks_finish_quickly() {
        let now = monday();
        let tasks: Vec<Task> = (0..1000)
            .map(|i| {
                let sensitivity = match i % 3 {
                    0 => TimeSensitivity::Today,
                    1 => TimeSensitivity::ThisWeek,
                    _ => TimeSensitivity::Anytime,
                };
                TaskBuilder::new(&format!("task-{i}"), sensitivity, now)
                    .created(now - Duration::hours(i))
                    .minutes(i % 90 + 5)
                    .build()
            })
            .collect();

        let started = Instant::now();
        let result = select_current_tasks_with(&tasks, &ResolvedFilterConfig::at(now));
        let elapsed = started.elapsed();

        assert_eq!(result.len(), 334 + 3);
        assert!(elapsed.as_millis() < 100, "took {elapsed:?}");
    }
}
