use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "repflow-cli", version, about = "Repflow goal planning CLI")]
struct Cli {
    /// Plan catalog to use instead of the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Goal calculation
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Compensation plans in the catalog
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Verticals and their adapters
    Vertical {
        #[command(subcommand)]
        action: commands::vertical::VerticalAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("REPFLOW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let catalog = cli.catalog.as_deref();
    let result = match cli.command {
        Commands::Goal { action } => commands::goal::run(action, catalog),
        Commands::Plan { action } => commands::plan::run(action, catalog),
        Commands::Vertical { action } => commands::vertical::run(action, catalog),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            commands::completions::run::<Cli>(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
