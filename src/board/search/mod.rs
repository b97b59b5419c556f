//! Minimax search over sowing positions.
//!
//! Features:
//! - Exact search to the end of the game, or a ply horizon with a
//!   store-difference estimate at the leaves
//! - Forced-result cutoff once the side to move has a proven win
//! - Transposition table with capacity-triggered flushes
//! - Retained best-line trees for book output

mod constants;
pub mod log;
mod params;
pub mod tree;

use std::io;
use std::time::Instant;

use crate::book::BookError;
use crate::tt::{RecordSink, StoreOutcome, TableEntry, TranspositionTable};

use super::{Board, Outcome, Score, Side, MAX_PLY};
pub use constants::{DEFAULT_REPLY_HORIZON, DEFAULT_TABLE_CAPACITY, MAX_REPLY_HORIZON};
pub use params::{PlyCounting, Recording, SearchParams};
use tree::{Compactor, NodeId, RetainedTree};

/// Statistics tracked during search
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub table_hits: u64,
    pub table_stores: u64,
    pub flushes: u32,
    pub max_ply: u32,
    pub time_ms: u128,
}

/// Outcome of [`Solver::solve`]
pub struct SearchResult {
    pub score: Score,
    /// Best move for the side to move at the root, absolute well index
    pub best_move: Option<usize>,
    pub stats: SearchStats,
    /// Present when the search recorded a tree
    pub tree: Option<RetainedTree>,
}

/// Sink used when nothing is persisted
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl RecordSink for NullSink {
    fn write_batch(&mut self, _batch: u32, _entries: &[TableEntry]) -> io::Result<()> {
        Ok(())
    }
}

struct Resolved {
    score: Score,
    best_move: Option<usize>,
    node: Option<NodeId>,
}

/// A single-threaded search instance.
///
/// Owns its board buffer, table, tree and sink, so independent solvers never
/// share mutable state.
pub struct Solver<S: RecordSink = NullSink> {
    params: SearchParams,
    /// `states[ply]` is the board at that ply of the current line
    states: Vec<Board>,
    table: Option<TranspositionTable>,
    compactor: Option<Compactor>,
    sink: S,
    stats: SearchStats,
}

impl Solver<NullSink> {
    pub fn without_sink(params: SearchParams) -> Result<Self, BookError> {
        Solver::new(params, NullSink)
    }
}

impl<S: RecordSink> Solver<S> {
    pub fn new(params: SearchParams, sink: S) -> Result<Self, BookError> {
        params.validate()?;
        Ok(Solver {
            params,
            states: Vec::with_capacity(MAX_PLY),
            table: None,
            compactor: None,
            sink,
            stats: SearchStats::default(),
        })
    }

    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Search `board` with `to_move` to play.
    ///
    /// Table recording starts from an empty table and flushes whatever is
    /// left when the search ends; tree recording returns the retained tree.
    pub fn solve(&mut self, board: Board, to_move: Side) -> Result<SearchResult, BookError> {
        let start = Instant::now();
        self.stats = SearchStats::default();
        self.states.clear();
        self.states.push(board);
        let perspective = self.params.perspective;

        match self.params.recording {
            Recording::Off => {
                self.table = None;
                self.compactor = None;
            }
            Recording::Table { capacity } => {
                self.table = Some(TranspositionTable::new(perspective, capacity));
                self.compactor = None;
            }
            Recording::Tree { reply_horizon } => {
                self.table = None;
                self.compactor = Some(Compactor::new(perspective, reply_horizon));
            }
        }

        ::log::info!(
            "solving {} to move, horizon {:?}, recording {:?}",
            to_move,
            self.params.horizon,
            self.params.recording
        );

        let root = self.search(0, to_move, self.params.horizon, true)?;

        if let Some(table) = self.table.as_mut() {
            if table.flush(&mut self.sink)? > 0 {
                self.stats.flushes += 1;
            }
        }

        let tree = match (self.compactor.take(), root.node) {
            (Some(compactor), Some(node)) => Some(compactor.finish(node, board, to_move)),
            _ => None,
        };

        self.stats.time_ms = start.elapsed().as_millis();
        ::log::info!(
            "solved: score {} best move {:?}, {} nodes, {} table hits, {} flushes",
            root.score,
            root.best_move,
            self.stats.nodes,
            self.stats.table_hits,
            self.stats.flushes
        );

        Ok(SearchResult {
            score: root.score,
            best_move: root.best_move,
            stats: self.stats.clone(),
            tree,
        })
    }

    fn set_state(&mut self, ply: usize, board: Board) {
        if ply < self.states.len() {
            self.states[ply] = board;
        } else {
            self.states.push(board);
        }
    }

    /// Ply budget left for the child after `mover` played.
    fn charge(&self, budget: Option<u32>, mover: Side, free_turn: bool) -> Option<u32> {
        budget.map(|left| match self.params.ply_counting {
            PlyCounting::EveryMove => left.saturating_sub(1),
            PlyCounting::PerspectiveMoves if mover == self.params.perspective && !free_turn => {
                left.saturating_sub(1)
            }
            PlyCounting::PerspectiveMoves => left,
        })
    }

    fn leaf(&mut self, score: Score, node: Option<NodeId>) -> Resolved {
        if let (Some(compactor), Some(id)) = (self.compactor.as_mut(), node) {
            compactor.close(id, score);
        }
        Resolved {
            score,
            best_move: None,
            node,
        }
    }

    fn search(
        &mut self,
        ply: usize,
        to_move: Side,
        budget: Option<u32>,
        record: bool,
    ) -> Result<Resolved, BookError> {
        self.stats.nodes += 1;
        self.stats.max_ply = self.stats.max_ply.max(ply as u32);

        let board = self.states[ply];
        let node = match self.compactor.as_mut() {
            Some(compactor) if record => Some(compactor.open(to_move, ply as u32)),
            _ => None,
        };

        if let Some(outcome) = board.outcome() {
            return Ok(self.leaf(outcome.into(), node));
        }
        if budget == Some(0) {
            return Ok(self.leaf(Score::Heuristic(board.store_difference()), node));
        }

        let key = match self.table.as_ref() {
            Some(table) if table.perspective() == to_move => Some(board.key()),
            _ => None,
        };
        if let (Some(table), Some(key)) = (self.table.as_ref(), key.as_ref()) {
            if let Some(hit) = table.probe(key, budget) {
                self.stats.table_hits += 1;
                return Ok(Resolved {
                    score: hit.score,
                    best_move: Some(hit.best_move as usize),
                    node: None,
                });
            }
        }

        let keep_children = match self.compactor.as_ref() {
            Some(compactor) => record && compactor.keeps_children(to_move, ply as u32),
            None => false,
        };

        let mut best: Option<(Score, usize)> = None;
        for well in to_move.wells() {
            if board.pits[well] == 0 {
                continue;
            }
            let sown = board.sow(well, to_move);
            self.set_state(ply + 1, sown.board);
            let child_budget = self.charge(budget, to_move, sown.free_turn());
            let child = self.search(ply + 1, sown.next_to_move(), child_budget, keep_children)?;

            let improved = best.map_or(true, |(score, _)| child.score.improves_on(score, to_move));
            if improved {
                best = Some((child.score, well));
            }
            if let (Some(compactor), Some(parent), Some(child_node)) =
                (self.compactor.as_mut(), node, child.node)
            {
                compactor.fold(parent, well, child_node, improved);
            }

            if self.params.cutoff && best.map_or(false, |(score, _)| score.is_win_for(to_move)) {
                break;
            }
        }

        let Some((score, well)) = best else {
            // No legal move: the other side banks what is left on its wells.
            let mut swept = board;
            swept.sweep_remaining(to_move);
            self.states[ply] = swept;
            let outcome = swept.outcome().unwrap_or(Outcome::Tie);
            return Ok(self.leaf(outcome.into(), node));
        };

        if let (Some(compactor), Some(id)) = (self.compactor.as_mut(), node) {
            compactor.close(id, score);
        }

        if let (Some(table), Some(key)) = (self.table.as_mut(), key) {
            let entry = TableEntry {
                depth: ply as u32,
                key,
                best_move: well as u8,
                score,
                budget,
            };
            match table.store(entry, &mut self.sink)? {
                StoreOutcome::Skipped | StoreOutcome::Replaced => {}
                StoreOutcome::Inserted => self.stats.table_stores += 1,
                StoreOutcome::Flushed { .. } => {
                    self.stats.table_stores += 1;
                    self.stats.flushes += 1;
                }
            }
        }

        Ok(Resolved {
            score,
            best_move: Some(well),
            node,
        })
    }
}
