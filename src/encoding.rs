//! State encoding for the learner
//!
//! A [`StateKey`] is the canonical form of a 3x3 observation. Each of the nine
//! cells contributes one base-3 digit (empty, citizen, intruder), most
//! significant digit first in row-major order, so the whole observation packs
//! into a `u16` (3^9 = 19683 distinct keys).
//!
//! Only occupant *kinds* take part in the key; which citizen sits in a cell
//! never changes it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::world::{Neighborhood, Occupant};

/// Number of distinct state keys.
pub const STATE_SPACE_SIZE: u16 = 19_683;

/// A validated, hashable encoding of a 3x3 neighborhood.
///
/// # Examples
///
/// ```
/// use intruder::encoding::{StateKey, encode};
/// use intruder::world::Occupant;
///
/// let mut cells = [Occupant::Empty; 9];
/// cells[4] = Occupant::Intruder;
/// cells[3] = Occupant::Citizen;
///
/// let key = encode(&cells);
/// assert_eq!(key.to_string(), "...CI....");
/// assert_eq!(StateKey::parse("...CI....").unwrap(), key);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateKey(u16);

/// Encode nine occupant tags into a [`StateKey`].
pub fn encode(cells: &[Occupant; 9]) -> StateKey {
    StateKey(
        cells
            .iter()
            .fold(0u16, |code, cell| code * 3 + cell.digit()),
    )
}

impl StateKey {
    /// Parse the nine-character text form (`.`, `C`, `I`).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidStateKey`] on a wrong length or an
    /// unknown character.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 9 {
            return Err(crate::Error::InvalidStateKey {
                key: s.to_string(),
                reason: format!("expected 9 cells, got {}", chars.len()),
            });
        }
        let mut cells = [Occupant::Empty; 9];
        for (i, (cell, c)) in cells.iter_mut().zip(chars).enumerate() {
            *cell = Occupant::from_char(c).ok_or_else(|| crate::Error::InvalidStateKey {
                key: s.to_string(),
                reason: format!("invalid character '{c}' at position {i}"),
            })?;
        }
        Ok(encode(&cells))
    }

    /// Decode back into the nine occupant tags.
    pub fn occupants(&self) -> [Occupant; 9] {
        let mut cells = [Occupant::Empty; 9];
        let mut code = self.0;
        for cell in cells.iter_mut().rev() {
            *cell = Occupant::from_digit(code % 3).unwrap_or(Occupant::Empty);
            code /= 3;
        }
        cells
    }

    /// The packed base-3 code.
    pub fn code(&self) -> u16 {
        self.0
    }

    /// Rebuild a key from its packed code.
    pub fn from_code(code: u16) -> Result<Self, crate::Error> {
        if code < STATE_SPACE_SIZE {
            Ok(StateKey(code))
        } else {
            Err(crate::Error::InvalidStateKey {
                key: code.to_string(),
                reason: format!("code must be below {STATE_SPACE_SIZE}"),
            })
        }
    }
}

impl From<&Neighborhood> for StateKey {
    fn from(neighborhood: &Neighborhood) -> Self {
        encode(neighborhood.cells())
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in self.occupants() {
            write!(f, "{}", cell.to_char())?;
        }
        Ok(())
    }
}

impl TryFrom<String> for StateKey {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StateKey::parse(&value)
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.to_string()
    }
}
