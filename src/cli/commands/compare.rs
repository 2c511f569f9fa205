//! Compare command - Learned policy against the baseline trajectory

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::SimulationArgs;
use crate::{
    cli::output::{print_kv, print_result, print_section, print_subsection},
    pipeline::compare_motion,
};

#[derive(Parser, Debug)]
#[command(
    about = "Compare learned motion with the baseline trajectory",
    allow_negative_numbers = true
)]
pub struct CompareArgs {
    #[command(flatten)]
    pub simulation: SimulationArgs,

    /// Ticks per discipline
    #[arg(long, short = 't', default_value_t = 10_000)]
    pub ticks: u64,

    /// Write the comparison as JSON
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn execute(args: CompareArgs) -> Result<()> {
    let config = args.simulation.resolve()?;
    let comparison = compare_motion(&config, args.ticks)?;

    print_section("Learned vs Baseline");
    print_kv("Seed", &comparison.seed.to_string());

    print_subsection("Learned policy");
    print_result(&comparison.learned);

    print_subsection("Baseline trajectory");
    print_result(&comparison.baseline);

    print_subsection("Difference");
    print_kv(
        "Mean reward gain",
        &format!("{:+.4}", comparison.reward_advantage()),
    );

    if let Some(path) = &args.output {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &comparison)?;
        println!("\nComparison written to {}", path.display());
    }

    Ok(())
}
