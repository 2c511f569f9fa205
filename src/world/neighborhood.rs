//! The 3x3 local observation around a cell

use std::fmt;

use serde::{Deserialize, Serialize};

use super::agent::Occupant;

/// Offsets visited when building a neighborhood, row-major (`dy` outer, `dx` inner).
pub const NEIGHBORHOOD_OFFSETS: [(i64, i64); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Occupants of the nine cells around (and including) a center cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Neighborhood(pub [Occupant; 9]);

impl Neighborhood {
    pub fn cells(&self) -> &[Occupant; 9] {
        &self.0
    }

    /// Occupant at offset `(dx, dy)` with both components in `-1..=1`.
    pub fn at(&self, dx: i64, dy: i64) -> Option<Occupant> {
        if !(-1..=1).contains(&dx) || !(-1..=1).contains(&dy) {
            return None;
        }
        Some(self.0[((dy + 1) * 3 + (dx + 1)) as usize])
    }

    pub fn center(&self) -> Occupant {
        self.0[4]
    }

    pub fn count(&self, occupant: Occupant) -> usize {
        self.0.iter().filter(|&&cell| cell == occupant).count()
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.chunks(3) {
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
