use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "focusflow", version, about = "FocusFlow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tasks to work on right now
    Focus(commands::focus::FocusArgs),
    /// Task snapshot utilities
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Pomodoro statistics
    Stats(commands::stats::StatsArgs),
    /// Pomodoro timer
    Timer(commands::timer::TimerArgs),
    /// Settings management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn install_tracing() {
    // RUST_LOG overrides; default is warnings only so stdout stays clean.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn main() {
    install_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Focus(args) => commands::focus::run(args),
        Commands::Task { action } => commands::task::run(action),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Timer(args) => commands::timer::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
