//! Statistics module for FocusFlow
//!
//! Per-day pomodoro aggregation (for weekly/monthly charts) and the daily
//! summary that pairs finished tasks with focused time.

mod daily_summary;
mod sessions;

pub use daily_summary::DailySummary;
pub use sessions::{
    aggregate_by_days, aggregate_range, completion_rate, DailyBreakdown, PeriodStats,
};
