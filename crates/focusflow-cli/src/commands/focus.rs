//! `focusflow focus`: the current-task list.

use clap::Args;
use focusflow_core::prioritizer::current_tasks_scored;
use focusflow_core::storage::load_tasks;
use focusflow_core::{FilterConfig, ScoredTask, Settings};
use std::path::PathBuf;

use super::parse_instant;

#[derive(Args)]
pub struct FocusArgs {
    /// Task snapshot (JSON array)
    #[arg(long)]
    pub tasks: PathBuf,
    /// Reference instant, RFC 3339 or local `YYYY-MM-DDTHH:MM:SS` (default: now)
    #[arg(long)]
    pub at: Option<String>,
    /// Maximum number of anytime tasks
    #[arg(long)]
    pub max_anytime: Option<usize>,
    /// Hour at which the evening starts (0-23)
    #[arg(long)]
    pub evening_start: Option<u32>,
    /// Age in days after which a task counts as old
    #[arg(long)]
    pub old_days: Option<i64>,
    /// Disable the evening short-task boost
    #[arg(long)]
    pub no_short_boost: bool,
    /// Include scores in the output
    #[arg(long)]
    pub scores: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl FocusArgs {
    fn overrides(&self) -> Result<FilterConfig, Box<dyn std::error::Error>> {
        let current_time = self.at.as_deref().map(parse_instant).transpose()?;
        Ok(FilterConfig {
            max_anytime_tasks: self.max_anytime,
            evening_start_hour: self.evening_start,
            old_task_days_threshold: self.old_days,
            prioritize_short_tasks: self.no_short_boost.then_some(false),
            current_time,
        })
    }
}

pub fn run(args: FocusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = load_tasks(&args.tasks)?;
    let config = Settings::read()?
        .filter_config()
        .merged_with(&args.overrides()?)
        .resolve();

    let selected = current_tasks_scored(&tasks, &config);
    tracing::debug!(
        total = tasks.len(),
        selected = selected.len(),
        at = %config.current_time,
        "computed focus list"
    );

    if args.json {
        let json = if args.scores {
            serde_json::to_string_pretty(&selected)?
        } else {
            let plain: Vec<_> = selected.iter().map(|s| s.task).collect();
            serde_json::to_string_pretty(&plain)?
        };
        println!("{json}");
        return Ok(());
    }

    if selected.is_empty() {
        println!("nothing to focus on");
        return Ok(());
    }
    for (i, entry) in selected.iter().enumerate() {
        println!("{}", format_line(i + 1, entry, args.scores));
    }
    Ok(())
}

fn format_line(rank: usize, entry: &ScoredTask<'_>, with_score: bool) -> String {
    let task = entry.task;
    let mut line = format!("{rank:>2}. [{:<9}] ", task.time_sensitivity.as_str());
    if with_score {
        line.push_str(&format!("{:>5}  ", entry.score));
    }
    line.push_str(&task.title);
    if let Some(minutes) = task.estimated_duration {
        line.push_str(&format!(" ({minutes}m)"));
    }
    line.push_str(&format!("  {}", task.id));
    line
}
