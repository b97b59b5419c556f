use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::KeyParseError;
use super::types::{Outcome, Side, PITS, SEEDS_PER_WELL};

/// Separator between counters in a [`StateKey`]
pub const KEY_SEPARATOR: char = ',';

/// Sixteen pit counters: South wells 0-6, South store 7,
/// North wells 8-14, North store 15.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Board {
    pub(crate) pits: [u8; PITS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting layout: seven seeds in every well, empty stores.
    #[must_use]
    pub fn new() -> Self {
        let mut pits = [SEEDS_PER_WELL; PITS];
        for side in Side::BOTH {
            pits[side.store()] = 0;
        }
        Board { pits }
    }

    #[must_use]
    pub const fn from_pits(pits: [u8; PITS]) -> Self {
        Board { pits }
    }

    #[inline]
    #[must_use]
    pub const fn pits(&self) -> &[u8; PITS] {
        &self.pits
    }

    #[inline]
    #[must_use]
    pub fn pit(&self, slot: usize) -> u8 {
        self.pits[slot]
    }

    #[inline]
    #[must_use]
    pub fn store(&self, side: Side) -> u8 {
        self.pits[side.store()]
    }

    /// Beads on the whole board; conserved by every move
    #[must_use]
    pub fn total(&self) -> u32 {
        self.pits.iter().map(|&n| u32::from(n)).sum()
    }

    /// Beads still in `side`'s wells
    #[must_use]
    pub fn well_total(&self, side: Side) -> u32 {
        self.pits[side.wells()].iter().map(|&n| u32::from(n)).sum()
    }

    /// Wells `side` may sow from, in increasing index order
    pub fn legal_moves(&self, side: Side) -> impl Iterator<Item = usize> + '_ {
        side.wells().filter(move |&well| self.pits[well] > 0)
    }

    #[must_use]
    pub fn has_moves(&self, side: Side) -> bool {
        self.pits[side.wells()].iter().any(|&n| n > 0)
    }

    /// Decided result, if any.
    ///
    /// A side holding more than half of the board's beads in its store has
    /// won; both stores holding exactly half is a tie.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        let total = self.total();
        let south = 2 * u32::from(self.store(Side::South));
        let north = 2 * u32::from(self.store(Side::North));
        if south > total {
            Some(Outcome::Win(Side::South))
        } else if north > total {
            Some(Outcome::Win(Side::North))
        } else if south == total && north == total {
            Some(Outcome::Tie)
        } else {
            None
        }
    }

    /// Horizon evaluation: South store minus North store
    #[inline]
    #[must_use]
    pub fn store_difference(&self) -> i32 {
        i32::from(self.store(Side::South)) - i32::from(self.store(Side::North))
    }

    /// Canonical cache key for this position
    #[must_use]
    pub fn key(&self) -> StateKey {
        let mut key = String::with_capacity(PITS * 3);
        for (slot, count) in self.pits.iter().enumerate() {
            if slot > 0 {
                key.push(KEY_SEPARATOR);
            }
            key.push_str(&count.to_string());
        }
        StateKey(key)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let north: Vec<String> = Side::North
            .wells()
            .rev()
            .map(|slot| format!("{:>2}", self.pits[slot]))
            .collect();
        let south: Vec<String> = Side::South
            .wells()
            .map(|slot| format!("{:>2}", self.pits[slot]))
            .collect();
        writeln!(f, "     {}", north.join(" "))?;
        writeln!(
            f,
            "{:>2}{:>23}",
            self.store(Side::North),
            self.store(Side::South)
        )?;
        write!(f, "     {}", south.join(" "))
    }
}

/// Order-stable textual form of a board, used as the transposition key.
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct StateKey(String);

impl StateKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rebuild the board this key was taken from.
    pub fn to_board(&self) -> Result<Board, KeyParseError> {
        let fields: Vec<&str> = self.0.split(KEY_SEPARATOR).collect();
        if fields.len() != PITS {
            return Err(KeyParseError::WrongLength {
                found: fields.len(),
            });
        }
        let mut pits = [0u8; PITS];
        for (pit, field) in pits.iter_mut().zip(&fields) {
            *pit = field
                .parse::<u8>()
                .map_err(|_| KeyParseError::InvalidCounter { field: field.to_string() })?;
        }
        Ok(Board { pits })
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StateKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = StateKey(s.to_string());
        key.to_board()?;
        Ok(key)
    }
}

impl FromStr for Board {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<StateKey>()?.to_board()
    }
}
