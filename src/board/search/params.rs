#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::constants::{DEFAULT_TABLE_CAPACITY, MAX_REPLY_HORIZON};
use crate::board::Side;
use crate::options::ConfigError;

/// Which moves use up the ply horizon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlyCounting {
    /// Only perspective-side moves that do not earn a free turn
    PerspectiveMoves,
    /// Every move, free turns included
    EveryMove,
}

/// What a search keeps besides its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Recording {
    Off,
    /// Transposition table flushed to flat records every `capacity` entries
    Table { capacity: usize },
    /// Retained best-line tree with opponent replies below `reply_horizon`
    Tree { reply_horizon: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchParams {
    /// Side the book is built for
    pub perspective: Side,
    /// Ply budget; `None` searches to the end of the game
    pub horizon: Option<u32>,
    pub ply_counting: PlyCounting,
    /// Stop at the first child proving a win for the side to move
    pub cutoff: bool,
    pub recording: Recording,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            perspective: Side::South,
            horizon: None,
            ply_counting: PlyCounting::PerspectiveMoves,
            cutoff: true,
            recording: Recording::Table {
                capacity: DEFAULT_TABLE_CAPACITY,
            },
        }
    }
}

impl SearchParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.recording {
            Recording::Table { capacity: 0 } => Err(ConfigError::InvalidValue {
                name: "table".to_string(),
                value: "0".to_string(),
            }),
            Recording::Tree { reply_horizon } if reply_horizon > MAX_REPLY_HORIZON => {
                Err(ConfigError::ReplyHorizonTooLarge {
                    found: reply_horizon,
                    max: MAX_REPLY_HORIZON,
                })
            }
            _ => Ok(()),
        }
    }
}
