//! Move application: sowing, capture, free turns and the stalled-side sweep.

use once_cell::sync::Lazy;
use rand::Rng;

use super::error::MoveError;
use super::state::Board;
use super::types::{Side, PITS};

/// `NEXT_SLOT[side][slot]` is the slot a seed sown by `side` lands in after
/// `slot`. The opposing store is skipped.
static NEXT_SLOT: Lazy<[[u8; PITS]; 2]> = Lazy::new(|| {
    let mut table = [[0u8; PITS]; 2];
    for side in Side::BOTH {
        let skipped = side.opponent().store();
        for slot in 0..PITS {
            let mut next = (slot + 1) % PITS;
            if next == skipped {
                next = (next + 1) % PITS;
            }
            table[side.index()][slot] = next as u8;
        }
    }
    table
});

/// Result of sowing one well.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sown {
    pub board: Board,
    /// Slot that received the last seed
    pub landing: usize,
    pub mover: Side,
}

impl Sown {
    /// The last seed landed in the mover's own store
    #[inline]
    #[must_use]
    pub fn free_turn(&self) -> bool {
        self.landing == self.mover.store()
    }

    #[inline]
    #[must_use]
    pub fn next_to_move(&self) -> Side {
        if self.free_turn() {
            self.mover
        } else {
            self.mover.opponent()
        }
    }
}

impl Board {
    /// Validate and play `well` for `side`.
    pub fn apply_move(&self, well: usize, side: Side) -> Result<Sown, MoveError> {
        if well >= PITS {
            return Err(MoveError::OutOfRange { well });
        }
        if !side.owns_well(well) {
            return Err(MoveError::WrongSide { well, side });
        }
        if self.pits[well] == 0 {
            return Err(MoveError::EmptyWell { well });
        }
        Ok(self.sow(well, side))
    }

    /// Play `well` for `side` without validation.
    ///
    /// Callers guarantee `well` is a non-empty well owned by `side`.
    #[must_use]
    pub fn sow(&self, well: usize, side: Side) -> Sown {
        debug_assert!(side.owns_well(well) && self.pits[well] > 0);

        let next = &NEXT_SLOT[side.index()];
        let mut board = *self;
        let beads = board.pits[well];
        board.pits[well] = 0;

        let mut slot = well;
        for _ in 0..beads {
            slot = next[slot] as usize;
            board.pits[slot] += 1;
        }

        if side.owns_well(slot) && board.pits[slot] == 1 {
            let opposite = 14 - slot;
            let captured = board.pits[opposite] + 1;
            board.pits[slot] = 0;
            board.pits[opposite] = 0;
            board.pits[side.store()] += captured;
        }

        Sown {
            board,
            landing: slot,
            mover: side,
        }
    }

    /// `stalled` has no move left: every bead in the other side's wells goes
    /// to that side's store. Afterwards [`Board::outcome`] is always decided.
    pub fn sweep_remaining(&mut self, stalled: Side) {
        let owner = stalled.opponent();
        let mut swept = 0u8;
        for well in owner.wells() {
            swept += self.pits[well];
            self.pits[well] = 0;
        }
        self.pits[owner.store()] += swept;
    }

    /// Play up to `plies` random legal moves from this position.
    ///
    /// Stops early at a decided or stalled position. Returns the reached
    /// board together with the side to move there.
    pub fn random_playout<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        to_move: Side,
        plies: usize,
    ) -> (Board, Side) {
        let mut board = *self;
        let mut side = to_move;
        for _ in 0..plies {
            if board.outcome().is_some() {
                break;
            }
            let moves: Vec<usize> = board.legal_moves(side).collect();
            if moves.is_empty() {
                break;
            }
            let well = moves[rng.gen_range(0..moves.len())];
            let sown = board.sow(well, side);
            board = sown.board;
            side = sown.next_to_move();
        }
        (board, side)
    }
}
