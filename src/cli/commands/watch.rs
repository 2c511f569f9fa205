//! Watch command - Paced run that renders the board every tick

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;

use super::SimulationArgs;
use crate::{
    cli::output::render_board,
    pipeline::{Cadence, TickScheduler},
    trainer::Trainer,
};

#[derive(Parser, Debug)]
#[command(about = "Watch the intruder move", allow_negative_numbers = true)]
pub struct WatchArgs {
    #[command(flatten)]
    pub simulation: SimulationArgs,

    /// Tick pacing: `slow`, `fast` or a millisecond interval
    #[arg(long, default_value = "slow")]
    pub cadence: Cadence,

    /// Number of ticks to show
    #[arg(long, short = 't', default_value_t = 200)]
    pub ticks: u64,

    /// Switch to the fast cadence after this many ticks
    #[arg(long)]
    pub fast_after: Option<u64>,

    /// Append frames instead of redrawing in place
    #[arg(long)]
    pub no_clear: bool,
}

pub fn execute(args: WatchArgs) -> Result<()> {
    let config = args.simulation.resolve()?;
    let mut trainer = Trainer::new(&config)?;
    let mut scheduler = TickScheduler::new(args.cadence);
    let stdout = io::stdout();

    let frame = |trainer: &Trainer, last: Option<String>| -> Result<()> {
        let mut out = stdout.lock();
        if !args.no_clear {
            write!(out, "\x1b[2J\x1b[H")?;
        }
        writeln!(out, "{}", render_board(trainer.world()))?;
        writeln!(
            out,
            "tick {}  {}",
            trainer.time(),
            trainer.scoreboard().summary_line()
        )?;
        if let Some(last) = last {
            writeln!(out, "{last}")?;
        }
        out.flush()?;
        Ok(())
    };

    frame(&trainer, None)?;
    scheduler.run(args.ticks, |scheduler| -> Result<bool> {
        let record = trainer.step()?;
        let action = record
            .decision
            .map(|d| format!("{} ({:?})", d.action, d.source))
            .unwrap_or_else(|| "trajectory".to_string());
        let last = format!(
            "{} -> {}  {}  {}  reward {}",
            record.from, record.to, action, record.outcome, record.reward
        );
        frame(&trainer, Some(last))?;
        if args.fast_after == Some(trainer.time()) {
            scheduler.set_cadence(Cadence::Fast);
        }
        Ok(true)
    })?;
    Ok(())
}
