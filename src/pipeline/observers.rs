//! Observer implementations for simulation runs
//!
//! Observers allow composable data collection during a run without coupling
//! the tick loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::Observer,
    q_learning::ActionSource,
    trainer::{Scoreboard, TickRecord},
    world::Outcome,
};

/// Progress bar observer - Shows run progress with a live score line
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    scoreboard: Scoreboard,
    /// Ticks seen since the current run started
    completed: u64,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            scoreboard: Scoreboard::default(),
            completed: 0,
        }
    }

    fn message(&self) -> String {
        format!(
            "C:{} E:{} S:{} X:{}",
            self.scoreboard.count(Outcome::MoveToCitizen),
            self.scoreboard.count(Outcome::MoveToEmpty),
            self.scoreboard.count(Outcome::Stay),
            self.scoreboard.count(Outcome::Collide)
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, total_ticks: u64) -> Result<()> {
        let pb = ProgressBar::new(total_ticks);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ticks ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.scoreboard = Scoreboard::default();
        self.completed = 0;
        Ok(())
    }

    fn on_tick(&mut self, record: &TickRecord) -> Result<()> {
        self.scoreboard.record(record.outcome, record.reward);
        self.completed += 1;
        if let Some(pb) = &self.progress_bar {
            pb.set_position(self.completed);
            // throttle redraws
            if self.completed.is_multiple_of(100) {
                pb.set_message(self.message());
            }
        }
        Ok(())
    }

    fn on_run_end(&mut self, _scoreboard: &Scoreboard) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Mean reward over one window of consecutive ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardPoint {
    /// Tick of the run at which the window closed
    pub tick: u64,
    pub mean_reward: f64,
    /// Fraction of the window's moves that landed on a citizen
    pub citizen_rate: f64,
}

/// Aggregates collected by [`MetricsObserver`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    pub scoreboard: Scoreboard,
    pub reward_curve: Vec<RewardPoint>,
    pub explored: u64,
    pub exploited: u64,
}

impl RunMetrics {
    /// Fraction of policy decisions that explored.
    pub fn exploration_share(&self) -> f64 {
        let decisions = self.explored + self.exploited;
        if decisions == 0 {
            0.0
        } else {
            self.explored as f64 / decisions as f64
        }
    }
}

/// Metrics observer - Tracks outcome counts and a windowed reward curve
///
/// The collected [`RunMetrics`] live behind a shared handle so they remain
/// readable after the observer has been boxed into a pipeline.
pub struct MetricsObserver {
    window: u64,
    metrics: Arc<Mutex<RunMetrics>>,
    window_board: Scoreboard,
    /// Ticks seen since the current run started
    completed: u64,
}

impl MetricsObserver {
    /// Close a reward-curve point every `window` ticks (at least one).
    pub fn new(window: u64) -> Self {
        Self {
            window: window.max(1),
            metrics: Arc::new(Mutex::new(RunMetrics::default())),
            window_board: Scoreboard::default(),
            completed: 0,
        }
    }

    pub fn handle(&self) -> Arc<Mutex<RunMetrics>> {
        Arc::clone(&self.metrics)
    }

    fn with_metrics<F: FnOnce(&mut RunMetrics)>(&self, f: F) -> Result<()> {
        let mut metrics = self
            .metrics
            .lock()
            .map_err(|_| Error::LockPoisoned { resource: "metrics" })?;
        f(&mut metrics);
        Ok(())
    }

    fn close_window(&mut self, tick: u64) -> Result<()> {
        if self.window_board.total() == 0 {
            return Ok(());
        }
        let moves = self.window_board.count(Outcome::MoveToCitizen)
            + self.window_board.count(Outcome::MoveToEmpty);
        let point = RewardPoint {
            tick,
            mean_reward: self.window_board.mean_reward(),
            citizen_rate: if moves == 0 {
                0.0
            } else {
                self.window_board.count(Outcome::MoveToCitizen) as f64 / moves as f64
            },
        };
        self.window_board = Scoreboard::default();
        self.with_metrics(|metrics| metrics.reward_curve.push(point))
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Observer for MetricsObserver {
    fn on_run_start(&mut self, _total_ticks: u64) -> Result<()> {
        self.completed = 0;
        self.window_board = Scoreboard::default();
        Ok(())
    }

    fn on_tick(&mut self, record: &TickRecord) -> Result<()> {
        self.window_board.record(record.outcome, record.reward);
        self.with_metrics(|metrics| {
            metrics.scoreboard.record(record.outcome, record.reward);
            match record.decision.map(|d| d.source) {
                Some(ActionSource::Explore) => metrics.explored += 1,
                Some(ActionSource::Exploit) => metrics.exploited += 1,
                None => {}
            }
        })?;
        self.completed += 1;
        if self.completed.is_multiple_of(self.window) {
            self.close_window(self.completed)?;
        }
        Ok(())
    }

    fn on_run_end(&mut self, _scoreboard: &Scoreboard) -> Result<()> {
        self.close_window(self.completed)
    }
}

/// JSONL observer - Writes one [`TickRecord`] per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create observations file {}", path.display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_tick(&mut self, record: &TickRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_run_end(&mut self, _scoreboard: &Scoreboard) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
