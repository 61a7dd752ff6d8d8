use chrono::NaiveDate;
use clap::Args;
use focusflow_core::stats::{aggregate_by_days, aggregate_range, DailySummary};
use focusflow_core::storage::{load_sessions, load_tasks};
use std::path::PathBuf;

#[derive(Args)]
pub struct StatsArgs {
    /// Session snapshot (JSON array)
    #[arg(long)]
    pub sessions: PathBuf,
    /// First day to include (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
    /// Summarize a single day instead (YYYY-MM-DD); needs --tasks
    #[arg(long, requires = "tasks", conflicts_with_all = ["from", "to"])]
    pub day: Option<NaiveDate>,
    /// Task snapshot used by --day
    #[arg(long)]
    pub tasks: Option<PathBuf>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let sessions = load_sessions(&args.sessions)?;

    if let (Some(day), Some(tasks)) = (args.day, &args.tasks) {
        let tasks = load_tasks(tasks)?;
        let summary = DailySummary::compute(day, &tasks, &sessions);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "{}: {} tasks done, {} created ({}% of new tasks done), {} min focused",
                summary.date,
                summary.tasks_completed,
                summary.tasks_created,
                summary.completion_rate,
                summary.total_duration
            );
        }
        return Ok(());
    }

    let stats = match (args.from, args.to) {
        (Some(from), Some(to)) => aggregate_range(&sessions, from, to),
        _ => aggregate_by_days(&sessions),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    for day in &stats.daily_breakdown {
        println!(
            "{}  {:>3} done  {:>3} interrupted  {:>4} min  {:>3}%",
            day.date,
            day.completed,
            day.interrupted,
            day.total_duration / 60,
            day.completion_rate
        );
    }
    println!(
        "total: {} done, {} interrupted, {} min, {:.1}/day",
        stats.total_completed,
        stats.total_interrupted,
        stats.total_duration / 60,
        stats.average_per_day
    );
    Ok(())
}
