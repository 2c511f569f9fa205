//! Intruder CLI - train, watch and compare the grid intruder
//!
//! Logs go to stderr (`RUST_LOG` overrides the `info` default) so board
//! frames and reports on stdout stay readable.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "intruder")]
#[command(version, about = "Q-learning intruder on a toroidal grid", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run headless training for a number of ticks
    Train(Box<intruder::cli::commands::train::TrainArgs>),

    /// Render the board tick by tick
    Watch(Box<intruder::cli::commands::watch::WatchArgs>),

    /// Compare the learned policy with the baseline trajectory
    Compare(Box<intruder::cli::commands::compare::CompareArgs>),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => intruder::cli::commands::train::execute(*args),
        Commands::Watch(args) => intruder::cli::commands::watch::execute(*args),
        Commands::Compare(args) => intruder::cli::commands::compare::execute(*args),
    }
}
