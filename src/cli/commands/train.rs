//! Train command - Run the intruder headless for a number of ticks

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use super::SimulationArgs;
use crate::{
    app::SimulationConfig,
    cli::output::{print_result, print_section, print_subsection},
    pipeline::{
        JsonlObserver, MetricsObserver, ProgressObserver, RewardPoint, TrainingConfig,
        TrainingPipeline, TrainingResult,
    },
    trainer::Trainer,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    reward_curve: &'a [RewardPoint],
    exploration_share: f64,
    config: &'a SimulationConfig,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no filename: treat as a directory.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the intruder", allow_negative_numbers = true)]
pub struct TrainArgs {
    #[command(flatten)]
    pub simulation: SimulationArgs,

    /// Number of ticks to run
    #[arg(long, short = 't', default_value_t = 10_000)]
    pub ticks: u64,

    /// Optional file for JSONL tick records
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Ticks per point of the reward curve
    #[arg(long, default_value_t = 500)]
    pub window: u64,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.simulation.resolve()?;
    let summary_path = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let mut trainer = Trainer::new(&config)?;

    let mut pipeline = TrainingPipeline::new(TrainingConfig { ticks: args.ticks });
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        pipeline = pipeline.with_observer(Box::new(JsonlObserver::new(path)?));
    }
    let metrics_observer = MetricsObserver::new(args.window);
    let metrics = metrics_observer.handle();
    pipeline = pipeline.with_observer(Box::new(metrics_observer));

    let result = pipeline.run(&mut trainer)?;

    print_section("Training Complete");
    print_result(&result);

    let metrics = metrics
        .lock()
        .map_err(|_| anyhow::anyhow!("metrics lock poisoned"))?
        .clone();
    if !metrics.reward_curve.is_empty() {
        print_subsection("Reward curve");
        for point in &metrics.reward_curve {
            println!(
                "  tick {:>8}  mean reward {:>9.4}  citizen share {:>5.1}%",
                point.tick,
                point.mean_reward,
                point.citizen_rate * 100.0
            );
        }
    }

    if let Some(path) = &args.observations {
        println!("\nObservations written to {}", path.display());
    }

    if let Some((summary_path, normalized)) = summary_path {
        if normalized {
            println!("\nNormalizing summary path to {}", summary_path.display());
        }
        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: &result,
            reward_curve: &metrics.reward_curve,
            exploration_share: metrics.exploration_share(),
            config: &config,
        };
        let file = File::create(&summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
