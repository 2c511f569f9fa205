//! Wall-clock pacing for interactive runs

use std::{
    fmt,
    str::FromStr,
    thread,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How often a paced run ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// 500 ms per tick
    #[default]
    Slow,
    /// 20 ms per tick
    Fast,
    Every(Duration),
}

impl Cadence {
    pub fn interval(self) -> Duration {
        match self {
            Cadence::Slow => Duration::from_millis(500),
            Cadence::Fast => Duration::from_millis(20),
            Cadence::Every(interval) => interval,
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Slow => f.write_str("slow"),
            Cadence::Fast => f.write_str("fast"),
            Cadence::Every(interval) => write!(f, "{}ms", interval.as_millis()),
        }
    }
}

impl FromStr for Cadence {
    type Err = Error;

    /// Accepts `slow`, `fast` or a millisecond count such as `250` / `250ms`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "slow" => Ok(Cadence::Slow),
            "fast" => Ok(Cadence::Fast),
            other => other
                .strip_suffix("ms")
                .unwrap_or(other)
                .parse::<u64>()
                .map(|ms| Cadence::Every(Duration::from_millis(ms)))
                .map_err(|_| Error::ParseCadence {
                    input: s.to_string(),
                    expected: "slow, fast, <millis>ms".to_string(),
                }),
        }
    }
}

/// Single-slot tick timer.
///
/// Holds at most one pending deadline. Changing the cadence cancels the
/// pending tick before the new interval applies, so two ticks can never be
/// in flight at once.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    cadence: Cadence,
    next_deadline: Option<Instant>,
}

impl TickScheduler {
    pub fn new(cadence: Cadence) -> Self {
        Self {
            cadence,
            next_deadline: None,
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Deadline of the pending tick, if one is armed.
    pub fn pending(&self) -> Option<Instant> {
        self.next_deadline
    }

    /// Arm the next tick one interval after `now`. No-op while a tick is pending.
    pub fn arm_at(&mut self, now: Instant) -> Instant {
        let interval = self.cadence.interval();
        *self.next_deadline.get_or_insert(now + interval)
    }

    /// Cancel the pending tick, if any.
    pub fn cancel(&mut self) -> bool {
        self.next_deadline.take().is_some()
    }

    /// Switch cadence. Returns whether a pending tick was cancelled.
    pub fn set_cadence(&mut self, cadence: Cadence) -> bool {
        let cancelled = self.cancel();
        self.cadence = cadence;
        cancelled
    }

    /// Consume the pending tick if its deadline has passed at `now`.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        match self.next_deadline {
            Some(deadline) if deadline <= now => {
                self.next_deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Block until the next tick is due, arming one if needed.
    pub fn wait(&mut self) {
        let deadline = self.arm_at(Instant::now());
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
        self.next_deadline = None;
    }

    /// Call `tick` once per interval, `ticks` times or until it returns `false`.
    pub fn run<F, E>(&mut self, ticks: u64, mut tick: F) -> std::result::Result<u64, E>
    where
        F: FnMut(&mut Self) -> std::result::Result<bool, E>,
    {
        let mut completed = 0;
        while completed < ticks {
            self.wait();
            completed += 1;
            if !tick(self)? {
                break;
            }
        }
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_parse() {
        assert_eq!("slow".parse::<Cadence>().unwrap(), Cadence::Slow);
        assert_eq!(" FAST ".parse::<Cadence>().unwrap(), Cadence::Fast);
        assert_eq!(
            "250ms".parse::<Cadence>().unwrap(),
            Cadence::Every(Duration::from_millis(250))
        );
        assert_eq!(
            "40".parse::<Cadence>().unwrap(),
            Cadence::Every(Duration::from_millis(40))
        );
        assert!("warp".parse::<Cadence>().is_err());
    }

    #[test]
    fn test_intervals() {
        assert_eq!(Cadence::Slow.interval(), Duration::from_millis(500));
        assert_eq!(Cadence::Fast.interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_arm_keeps_single_deadline() {
        let mut scheduler = TickScheduler::new(Cadence::Slow);
        let now = Instant::now();
        let first = scheduler.arm_at(now);
        let second = scheduler.arm_at(now + Duration::from_millis(100));
        assert_eq!(first, second);
        assert_eq!(first, now + Duration::from_millis(500));
    }

    #[test]
    fn test_set_cadence_cancels_pending_tick() {
        let mut scheduler = TickScheduler::new(Cadence::Slow);
        let now = Instant::now();
        scheduler.arm_at(now);

        assert!(scheduler.set_cadence(Cadence::Fast));
        assert_eq!(scheduler.pending(), None);
        // The old slow deadline no longer fires
        assert!(!scheduler.poll_at(now + Duration::from_millis(600)));

        let deadline = scheduler.arm_at(now);
        assert_eq!(deadline, now + Duration::from_millis(20));
        assert!(scheduler.set_cadence(Cadence::Slow));
        assert!(!scheduler.set_cadence(Cadence::Fast));
    }

    #[test]
    fn test_poll_consumes_due_tick() {
        let mut scheduler = TickScheduler::new(Cadence::Fast);
        let now = Instant::now();
        scheduler.arm_at(now);
        assert!(!scheduler.poll_at(now));
        assert!(scheduler.poll_at(now + Duration::from_millis(20)));
        assert!(!scheduler.poll_at(now + Duration::from_millis(40)));
    }

    #[test]
    fn test_run_stops_when_callback_declines() {
        let mut scheduler = TickScheduler::new(Cadence::Every(Duration::from_millis(1)));
        let mut calls = 0;
        let completed = scheduler
            .run(10, |_| {
                calls += 1;
                Ok::<_, Error>(calls < 3)
            })
            .unwrap();
        assert_eq!(completed, 3);
        assert_eq!(calls, 3);
    }
}
