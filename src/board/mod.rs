//! Board representation, sowing rules and search.
//!
//! Two sides each own seven wells and a store. A move empties one of the
//! mover's wells and sows its seeds counter-clockwise, skipping the opposing
//! store. Landing in the mover's store earns a free turn; landing in an empty
//! own well captures the opposite well.
//!
//! # Example
//! ```
//! use kalah_book::board::{Board, Side};
//!
//! let board = Board::new();
//! let sown = board.apply_move(2, Side::South).unwrap();
//! assert_eq!(sown.landing, 9);
//! assert_eq!(sown.next_to_move(), Side::North);
//! ```

mod error;
pub mod search;
mod sow;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{KeyParseError, MoveError, ScoreParseError, SideParseError};
pub use sow::Sown;
pub use state::{Board, StateKey, KEY_SEPARATOR};
pub use types::{
    Outcome, Score, Side, PITS, PITS_PER_SIDE, SEEDS_PER_WELL, START_TOTAL, WELLS_PER_SIDE,
    WIN_RANK,
};

pub use search::log::{SearchInfo, SearchLogger, SilentLogger, StdoutLogger};
pub use search::tree::{NodeId, RetainedTree, TreeArena};
pub use search::{
    NullSink, PlyCounting, Recording, SearchParams, SearchResult, SearchStats, Solver,
    DEFAULT_REPLY_HORIZON, DEFAULT_TABLE_CAPACITY, MAX_REPLY_HORIZON,
};

pub(crate) use types::MAX_PLY;
