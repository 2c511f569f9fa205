//! Parametric baseline path for the intruder
//!
//! The intruder can follow a fixed Lissajous-style curve over the torus
//! instead of the learned policy. Runs using this path serve as a baseline
//! for the learned movement; the two are never mixed within one tick.

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, Position};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Angular speed `v`; x oscillates at `2v`, y at `v`.
    pub speed: f64,
}

impl Trajectory {
    pub const DEFAULT_SPEED: f64 = 0.1;

    pub fn new(speed: f64) -> Self {
        Self { speed }
    }

    /// Cell occupied at tick `time`.
    ///
    /// `x = floor(W/2 * (sin(2vt) + 1))`, `y = floor(H/2 * (cos(vt) + 1))`,
    /// both wrapped onto the grid (the curve touches `W` and `H` at its peaks).
    pub fn position_at(&self, dimensions: Dimensions, time: u64) -> Position {
        let t = time as f64;
        let width = dimensions.width() as f64;
        let height = dimensions.height() as f64;
        let x = (width * 0.5 * ((2.0 * self.speed * t).sin() + 1.0)).floor() as i64;
        let y = (height * 0.5 * ((self.speed * t).cos() + 1.0)).floor() as i64;
        dimensions.wrap(x, y)
    }
}

impl Default for Trajectory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPEED)
    }
}
