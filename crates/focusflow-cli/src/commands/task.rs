//! Task snapshot commands.

use chrono::Utc;
use clap::Subcommand;
use focusflow_core::storage::{load_tasks, save_tasks};
use focusflow_core::{CoreError, CreateTaskInput, Task, TimeSensitivity, UpdateTaskInput};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a snapshot (created if missing)
    Add {
        /// Task snapshot (JSON array)
        file: PathBuf,
        /// Task title
        title: String,
        /// today, this_week or anytime
        #[arg(long, default_value = "today")]
        sensitivity: TimeSensitivity,
        /// Estimated minutes
        #[arg(long)]
        minutes: Option<u32>,
        /// Task description
        #[arg(long)]
        description: Option<String>,
    },
    /// List tasks
    List {
        /// Task snapshot (JSON array)
        file: PathBuf,
        /// Only open tasks
        #[arg(long, conflicts_with = "completed")]
        open: bool,
        /// Only completed tasks
        #[arg(long)]
        completed: bool,
        /// Only tasks with this sensitivity
        #[arg(long)]
        sensitivity: Option<TimeSensitivity>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a task
    Update {
        /// Task snapshot (JSON array)
        file: PathBuf,
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
        /// today, this_week or anytime
        #[arg(long)]
        sensitivity: Option<TimeSensitivity>,
        /// New estimated minutes
        #[arg(long, conflicts_with = "clear_minutes")]
        minutes: Option<u32>,
        /// Remove the estimate
        #[arg(long)]
        clear_minutes: bool,
        /// Mark completed
        #[arg(long, conflicts_with = "reopen")]
        done: bool,
        /// Mark open again
        #[arg(long)]
        reopen: bool,
    },
    /// Remove a task from a snapshot
    Delete {
        /// Task snapshot (JSON array)
        file: PathBuf,
        /// Task ID
        id: String,
    },
    /// Check every task in a snapshot
    Validate {
        /// Task snapshot (JSON array)
        file: PathBuf,
    },
    /// Lower a task's urgency by one level
    Defer {
        /// Task snapshot (JSON array)
        file: PathBuf,
        /// Task ID
        id: String,
    },
    /// Mark a task completed
    Complete {
        /// Task snapshot (JSON array)
        file: PathBuf,
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TaskAction::Add {
            file,
            title,
            sensitivity,
            minutes,
            description,
        } => {
            let mut tasks = if file.exists() {
                load_tasks(&file)?
            } else {
                Vec::new()
            };
            let input = CreateTaskInput {
                title,
                description,
                time_sensitivity: sensitivity,
                estimated_duration: minutes,
            };
            let task = Task::create(input, Utc::now())?;
            println!("{}", task.id);
            tasks.push(task);
            save_tasks(&file, &tasks)?;
        }
        TaskAction::List {
            file,
            open,
            completed,
            sensitivity,
            json,
        } => {
            let tasks = load_tasks(&file)?;
            let listed: Vec<&Task> = tasks
                .iter()
                .filter(|t| !open || !t.is_completed)
                .filter(|t| !completed || t.is_completed)
                .filter(|t| sensitivity.map_or(true, |s| t.time_sensitivity == s))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&listed)?);
            } else {
                for task in listed {
                    println!("{}", format_row(task));
                }
            }
        }
        TaskAction::Update {
            file,
            id,
            title,
            description,
            clear_description,
            sensitivity,
            minutes,
            clear_minutes,
            done,
            reopen,
        } => {
            let update = UpdateTaskInput {
                title,
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
                is_completed: match (done, reopen) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                time_sensitivity: sensitivity,
                estimated_duration: if clear_minutes {
                    Some(None)
                } else {
                    minutes.map(Some)
                },
            };
            with_task(&file, &id, |task| {
                task.apply_update(update, Utc::now())?;
                println!("{}", format_row(task));
                Ok(())
            })?;
        }
        TaskAction::Delete { file, id } => {
            let mut tasks = load_tasks(&file)?;
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            if tasks.len() == before {
                return Err(CoreError::TaskNotFound(id).into());
            }
            save_tasks(&file, &tasks)?;
            println!("{id} deleted");
        }
        TaskAction::Validate { file } => {
            let tasks = load_tasks(&file)?;
            let mut invalid = 0usize;
            for task in &tasks {
                if let Err(e) = task.validate() {
                    invalid += 1;
                    println!("{}: {e}", task.id);
                }
            }
            if invalid > 0 {
                return Err(format!("{invalid} of {} tasks invalid", tasks.len()).into());
            }
            println!("{} tasks ok", tasks.len());
        }
        TaskAction::Defer { file, id } => {
            with_task(&file, &id, |task| {
                if task.defer(Utc::now()) {
                    println!("{id} -> {}", task.time_sensitivity);
                } else {
                    println!("{id} already {}", task.time_sensitivity);
                }
                Ok(())
            })?;
        }
        TaskAction::Complete { file, id } => {
            with_task(&file, &id, |task| {
                task.set_completed(true, Utc::now());
                println!("{id} completed");
                Ok(())
            })?;
        }
    }
    Ok(())
}

fn format_row(task: &Task) -> String {
    let mark = if task.is_completed { "x" } else { " " };
    let mut line = format!("[{mark}] [{:<9}] {}", task.time_sensitivity.as_str(), task.title);
    if let Some(minutes) = task.estimated_duration {
        line.push_str(&format!(" ({minutes}m)"));
    }
    line.push_str(&format!("  {}", task.id));
    line
}

/// Load the snapshot, apply `f` to the task with `id`, and write it back.
/// Nothing is written when `f` fails.
fn with_task(
    path: &Path,
    id: &str,
    f: impl FnOnce(&mut Task) -> Result<(), CoreError>,
) -> Result<(), CoreError> {
    let mut tasks = load_tasks(path)?;
    let task = tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
    f(task)?;
    save_tasks(path, &tasks)
}
