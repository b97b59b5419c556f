//! Game outcomes and search scores.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Side;
use crate::board::error::ScoreParseError;

/// Rank of a proven win; every heuristic value lies strictly inside
/// `-WIN_RANK..WIN_RANK`.
pub const WIN_RANK: i32 = 1000;

/// Decided result of a position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Outcome {
    Win(Side),
    Tie,
}

/// Value of a searched position.
///
/// `Won` and `Tied` come from decided positions; `Heuristic` carries the
/// store difference (South minus North) of a position cut off by the ply
/// horizon. Scores are ordered from South's point of view via [`Score::rank`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Score {
    Won(Side),
    Tied,
    Heuristic(i32),
}

impl Score {
    /// South-positive ordering key
    #[inline]
    #[must_use]
    pub const fn rank(self) -> i32 {
        match self {
            Score::Won(side) => side.sign() * WIN_RANK,
            Score::Tied => 0,
            Score::Heuristic(diff) => diff,
        }
    }

    /// Rank seen from `side`
    #[inline]
    #[must_use]
    pub const fn for_side(self, side: Side) -> i32 {
        self.rank() * side.sign()
    }

    /// True unless the value is a horizon estimate
    #[inline]
    #[must_use]
    pub const fn is_exact(self) -> bool {
        !matches!(self, Score::Heuristic(_))
    }

    #[inline]
    #[must_use]
    pub fn is_win_for(self, side: Side) -> bool {
        self == Score::Won(side)
    }

    #[inline]
    #[must_use]
    pub fn is_loss_for(self, side: Side) -> bool {
        self == Score::Won(side.opponent())
    }

    /// Strictly better than `other` for `side`. Equal ranks are never better,
    /// which keeps the first best move found.
    #[inline]
    #[must_use]
    pub const fn improves_on(self, other: Score, side: Side) -> bool {
        self.for_side(side) > other.for_side(side)
    }
}

impl From<Outcome> for Score {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win(side) => Score::Won(side),
            Outcome::Tie => Score::Tied,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Won(Side::South) => write!(f, "1"),
            Score::Won(Side::North) => write!(f, "-1"),
            Score::Tied => write!(f, "0"),
            Score::Heuristic(diff) => write!(f, "h{diff}"),
        }
    }
}

impl FromStr for Score {
    type Err = ScoreParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Score::Won(Side::South)),
            "-1" => Ok(Score::Won(Side::North)),
            "0" => Ok(Score::Tied),
            _ => s
                .strip_prefix('h')
                .and_then(|diff| diff.parse::<i32>().ok())
                .filter(|diff| diff.abs() < WIN_RANK)
                .map(Score::Heuristic)
                .ok_or_else(|| ScoreParseError {
                    found: s.to_string(),
                }),
        }
    }
}
