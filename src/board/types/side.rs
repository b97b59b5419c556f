//! Side types.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{PITS_PER_SIDE, WELLS_PER_SIDE};
use crate::board::error::SideParseError;

/// The two players. South sows from wells 0-6 into store 7,
/// North from wells 8-14 into store 15.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    South,
    North,
}

impl Side {
    /// Both sides in index order (South=0, North=1)
    pub const BOTH: [Side; 2] = [Side::South, Side::North];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::South => 0,
            Side::North => 1,
        }
    }

    /// Returns the opposing side
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Side {
        match self {
            Side::South => Side::North,
            Side::North => Side::South,
        }
    }

    /// Index of this side's first well
    #[inline]
    #[must_use]
    pub const fn first_well(self) -> usize {
        self.index() * PITS_PER_SIDE
    }

    /// Index of this side's store
    #[inline]
    #[must_use]
    pub const fn store(self) -> usize {
        self.first_well() + WELLS_PER_SIDE
    }

    #[inline]
    #[must_use]
    pub const fn wells(self) -> Range<usize> {
        self.first_well()..self.store()
    }

    #[inline]
    #[must_use]
    pub const fn owns_well(self, slot: usize) -> bool {
        slot >= self.first_well() && slot < self.store()
    }

    /// Sign applied to South-positive scores (+1 for South, -1 for North)
    #[inline]
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Side::South => 1,
            Side::North => -1,
        }
    }

    /// Well index relative to this side's first well, if the well is ours
    #[inline]
    #[must_use]
    pub const fn relative_well(self, slot: usize) -> Option<usize> {
        if self.owns_well(slot) {
            Some(slot - self.first_well())
        } else {
            None
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::South => write!(f, "south"),
            Side::North => write!(f, "north"),
        }
    }
}

impl FromStr for Side {
    type Err = SideParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "south" => Ok(Side::South),
            "n" | "north" => Ok(Side::North),
            _ => Err(SideParseError {
                found: s.to_string(),
            }),
        }
    }
}
