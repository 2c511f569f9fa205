//! Observer port - abstraction for run observation and data collection
//!
//! Lets the pipeline report ticks without knowing where the data goes.

use crate::{Result, trainer::Scoreboard, trainer::TickRecord};

/// Observer trait for monitoring a simulation run
///
/// Observers can be composed to collect different kinds of data during a run:
/// progress bars, JSONL export, aggregate metrics.
///
/// # Event Sequence
///
/// 1. `on_run_start(total_ticks)` - once at the beginning
/// 2. `on_tick(record)` - after every completed tick
/// 3. `on_run_end(scoreboard)` - once at the end
///
/// # Examples
///
/// ```
/// use intruder::{ports::Observer, trainer::TickRecord, world::Outcome};
///
/// struct CitizenCounter {
///     hits: u64,
/// }
///
/// impl Observer for CitizenCounter {
///     fn on_tick(&mut self, record: &TickRecord) -> intruder::Result<()> {
///         if record.outcome == Outcome::MoveToCitizen {
///             self.hits += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first tick.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_run_start(&mut self, _total_ticks: u64) -> Result<()> {
        Ok(())
    }

    /// Called after each tick, once the world and table are consistent again.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_tick(&mut self, _record: &TickRecord) -> Result<()> {
        Ok(())
    }

    /// Called once after the last tick. Flush files or print summaries here.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_run_end(&mut self, _scoreboard: &Scoreboard) -> Result<()> {
        Ok(())
    }
}
