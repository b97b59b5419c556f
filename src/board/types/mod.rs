//! Core game types.
//!
//! - `Side` - the two players and their pit layout
//! - `Outcome` and `Score` - decided results and search values
//! - board geometry constants

mod score;
mod side;

pub use score::{Outcome, Score, WIN_RANK};
pub use side::Side;

/// Wells per side (stores excluded)
pub const WELLS_PER_SIDE: usize = 7;

/// Wells plus the store
pub const PITS_PER_SIDE: usize = WELLS_PER_SIDE + 1;

/// Slots on the whole board
pub const PITS: usize = 2 * PITS_PER_SIDE;

/// Seeds in every well of the starting layout
pub const SEEDS_PER_WELL: u8 = 7;

/// Beads on the starting board
pub const START_TOTAL: u32 = (WELLS_PER_SIDE as u32) * (SEEDS_PER_WELL as u32) * 2;

/// Initial capacity of the per-search board buffer
pub(crate) const MAX_PLY: usize = 200;
