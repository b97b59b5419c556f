//! Splitting the first move across independent workers.
//!
//! The legal first moves of the root are dealt out in contiguous ranges,
//! the remainder going to the lowest worker indices. Every worker searches
//! its moves with its own solver, table and tree and writes its own files,
//! so workers can run as separate processes or as threads of [`BookRun::run_all`].

use std::fmt;
use std::path::PathBuf;
use std::thread;

use parking_lot::Mutex;

use crate::board::{
    Board, Recording, Score, SearchInfo, SearchLogger, SearchParams, SearchResult, SearchStats,
    Side, Solver,
};
use crate::book::{write_tree_file, BookError, FlatFileSink};

/// Error type for invalid worker assignments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    NoWorkers,
    IndexOutOfRange { index: usize, workers: usize },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionError::NoWorkers => write!(f, "Worker count must be at least 1"),
            PartitionError::IndexOutOfRange { index, workers } => {
                write!(f, "Worker index {index} out of range for {workers} workers")
            }
        }
    }
}

impl std::error::Error for PartitionError {}

/// The first moves assigned to one worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    pub workers: usize,
    pub index: usize,
    pub moves: Vec<usize>,
}

impl Partition {
    pub fn new(root_moves: &[usize], workers: usize, index: usize) -> Result<Self, PartitionError> {
        if workers == 0 {
            return Err(PartitionError::NoWorkers);
        }
        if index >= workers {
            return Err(PartitionError::IndexOutOfRange { index, workers });
        }

        let base = root_moves.len() / workers;
        let extra = root_moves.len() % workers;
        let start = index * base + index.min(extra);
        let len = base + usize::from(index < extra);

        Ok(Partition {
            workers,
            index,
            moves: root_moves[start..start + len].to_vec(),
        })
    }

    /// Partitions of every worker, in index order
    pub fn all(root_moves: &[usize], workers: usize) -> Result<Vec<Self>, PartitionError> {
        (0..workers.max(1))
            .map(|index| Partition::new(root_moves, workers, index))
            .collect()
    }
}

/// Result of searching one first move
#[derive(Clone, Debug)]
pub struct MoveSummary {
    pub first_move: usize,
    pub score: Score,
    /// Best answer at the position after the first move
    pub best_reply: Option<usize>,
    pub stats: SearchStats,
    pub files: Vec<PathBuf>,
}

impl MoveSummary {
    fn new(first_move: usize, result: &SearchResult, files: Vec<PathBuf>) -> Self {
        MoveSummary {
            first_move,
            score: result.score,
            best_reply: result.best_move,
            stats: result.stats.clone(),
            files,
        }
    }

    #[must_use]
    pub fn info(&self) -> SearchInfo {
        SearchInfo {
            first_move: self.first_move,
            score: self.score,
            best_reply: self.best_reply,
            nodes: self.stats.nodes,
            table_hits: self.stats.table_hits,
            flushes: self.stats.flushes,
            max_ply: self.stats.max_ply,
            time_ms: self.stats.time_ms,
        }
    }
}

/// A book computation from a fixed root.
pub struct BookRun {
    pub params: SearchParams,
    pub board: Board,
    /// Side making the first move
    pub first_mover: Side,
    pub out_dir: PathBuf,
}

impl BookRun {
    /// Book from the standard starting layout with South to open.
    pub fn new(params: SearchParams, out_dir: impl Into<PathBuf>) -> Self {
        BookRun {
            params,
            board: Board::new(),
            first_mover: Side::South,
            out_dir: out_dir.into(),
        }
    }

    #[must_use]
    pub fn root_moves(&self) -> Vec<usize> {
        self.board.legal_moves(self.first_mover).collect()
    }

    /// Play `first_move`, search the resulting position and write its files.
    pub fn run_move(&self, first_move: usize) -> Result<MoveSummary, BookError> {
        let sown = self.board.apply_move(first_move, self.first_mover)?;
        let to_move = sown.next_to_move();
        log::info!("searching first move {first_move}, {to_move} to reply");

        match self.params.recording {
            Recording::Table { .. } => {
                let sink = FlatFileSink::new(
                    self.out_dir.clone(),
                    self.params.perspective,
                    first_move,
                );
                let mut solver = Solver::new(self.params.clone(), sink)?;
                let result = solver.solve(sown.board, to_move)?;
                let files = solver.into_sink().into_files();
                Ok(MoveSummary::new(first_move, &result, files))
            }
            Recording::Tree { .. } => {
                let mut solver = Solver::without_sink(self.params.clone())?;
                let result = solver.solve(sown.board, to_move)?;
                let files = match result.tree.as_ref() {
                    Some(tree) => vec![write_tree_file(
                        &self.out_dir,
                        tree,
                        first_move,
                        self.params.horizon,
                    )?],
                    None => Vec::new(),
                };
                Ok(MoveSummary::new(first_move, &result, files))
            }
            Recording::Off => {
                let mut solver = Solver::without_sink(self.params.clone())?;
                let result = solver.solve(sown.board, to_move)?;
                Ok(MoveSummary::new(first_move, &result, Vec::new()))
            }
        }
    }

    /// Search every move of `partition` in order.
    pub fn run_partition(
        &self,
        partition: &Partition,
        logger: &dyn SearchLogger,
    ) -> Result<Vec<MoveSummary>, BookError> {
        log::info!(
            "worker {}/{}: first moves {:?}",
            partition.index,
            partition.workers,
            partition.moves
        );
        let mut summaries = Vec::with_capacity(partition.moves.len());
        for &first_move in &partition.moves {
            let summary = self.run_move(first_move)?;
            logger.info(&summary.info());
            summaries.push(summary);
        }
        Ok(summaries)
    }

    /// Run all `workers` partitions on their own threads.
    ///
    /// Summaries come back sorted by first move. The first failing worker's
    /// error is returned once every thread has finished.
    pub fn run_all(
        &self,
        workers: usize,
        logger: &(dyn SearchLogger + Sync),
    ) -> Result<Vec<MoveSummary>, BookError> {
        let partitions = Partition::all(&self.root_moves(), workers)?;
        let summaries = Mutex::new(Vec::new());
        let failure: Mutex<Option<BookError>> = Mutex::new(None);

        thread::scope(|scope| {
            for partition in &partitions {
                let summaries = &summaries;
                let failure = &failure;
                scope.spawn(move || match self.run_partition(partition, logger) {
                    Ok(done) => summaries.lock().extend(done),
                    Err(e) => {
                        log::warn!("worker {} failed: {e}", partition.index);
                        let mut slot = failure.lock();
                        if slot.is_none() {
                            *slot = Some(e);
                        }
                    }
                });
            }
        });

        if let Some(e) = failure.into_inner() {
            return Err(e);
        }
        let mut summaries = summaries.into_inner();
        summaries.sort_by_key(|summary: &MoveSummary| summary.first_move);
        Ok(summaries)
    }
}
