//! Transposition table for caching search results.
//!
//! Entries are keyed by the canonical board key and only describe positions
//! where the table's perspective side is to move. The table never evicts:
//! once it holds `capacity` entries it is sorted by depth, written out to a
//! [`RecordSink`] as one batch and cleared.

use std::collections::HashMap;
use std::io;

use crate::board::{Score, Side, StateKey};

/// A cached search result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableEntry {
    /// Ply from the search root
    pub depth: u32,
    pub key: StateKey,
    pub best_move: u8,
    pub score: Score,
    /// Ply budget left when the entry was computed
    pub budget: Option<u32>,
}

/// Destination for flushed table batches.
pub trait RecordSink {
    fn write_batch(&mut self, batch: u32, entries: &[TableEntry]) -> io::Result<()>;
}

/// What [`TranspositionTable::store`] did with an entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Proven loss for the perspective side; not cached
    Skipped,
    Inserted,
    /// Key was already cached under another budget. The earlier entry is
    /// dropped and only this one will be written.
    Replaced,
    /// Inserted, then the full table was flushed
    Flushed { written: usize },
}

pub struct TranspositionTable {
    perspective: Side,
    capacity: usize,
    entries: Vec<TableEntry>,
    index: HashMap<StateKey, usize>,
    batches: u32,
}

impl TranspositionTable {
    #[must_use]
    pub fn new(perspective: Side, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        TranspositionTable {
            perspective,
            capacity,
            entries: Vec::with_capacity(capacity.min(1 << 16)),
            index: HashMap::with_capacity(capacity.min(1 << 16)),
            batches: 0,
        }
    }

    #[must_use]
    pub fn perspective(&self) -> Side {
        self.perspective
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Batches written so far
    #[must_use]
    pub fn batches(&self) -> u32 {
        self.batches
    }

    /// Look up `key`. Only entries computed with the same ply budget are
    /// served, so a hit always equals what a fresh search would return.
    #[must_use]
    pub fn probe(&self, key: &StateKey, budget: Option<u32>) -> Option<&TableEntry> {
        self.index
            .get(key)
            .map(|&slot| &self.entries[slot])
            .filter(|entry| entry.budget == budget)
    }

    /// Cache an entry, flushing the whole table to `sink` once it is full.
    ///
    /// A key already in the table is overwritten in place and reported as
    /// [`StoreOutcome::Replaced`]; the table never grows on a replacement.
    pub fn store<S: RecordSink + ?Sized>(
        &mut self,
        entry: TableEntry,
        sink: &mut S,
    ) -> io::Result<StoreOutcome> {
        if entry.score.is_loss_for(self.perspective) {
            return Ok(StoreOutcome::Skipped);
        }

        if let Some(&slot) = self.index.get(&entry.key) {
            self.entries[slot] = entry;
            return Ok(StoreOutcome::Replaced);
        }
        self.index.insert(entry.key.clone(), self.entries.len());
        self.entries.push(entry);

        if self.entries.len() >= self.capacity {
            let written = self.flush(sink)?;
            return Ok(StoreOutcome::Flushed { written });
        }
        Ok(StoreOutcome::Inserted)
    }

    /// Stable sort from shallow to deep entries.
    pub fn sort_by_depth(&mut self) {
        self.entries.sort_by_key(|entry| entry.depth);
        for (slot, entry) in self.entries.iter().enumerate() {
            if let Some(index) = self.index.get_mut(&entry.key) {
                *index = slot;
            }
        }
    }

    /// Write every entry to `sink` as one batch and clear the table.
    ///
    /// An empty table writes nothing. Entries are only dropped after the
    /// sink accepted them.
    pub fn flush<S: RecordSink + ?Sized>(&mut self, sink: &mut S) -> io::Result<usize> {
        if self.entries.is_empty() {
            return Ok(0);
        }
        self.sort_by_depth();
        sink.write_batch(self.batches, &self.entries)?;
        self.batches += 1;

        let written = self.entries.len();
        log::debug!(
            "flushed {} {} table entries as batch {}",
            written,
            self.perspective,
            self.batches - 1
        );
        self.clear();
        Ok(written)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::book::MemorySink;

    struct Broken;

    impl RecordSink for Broken {
        fn write_batch(&mut self, _batch: u32, _entries: &[TableEntry]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    fn entry(pits_seed: u8, depth: u32, score: Score) -> TableEntry {
        let mut pits = *Board::new().pits();
        pits[0] = pits_seed;
        TableEntry {
            depth,
            key: Board::from_pits(pits).key(),
            best_move: 3,
            score,
            budget: None,
        }
    }

    #[test]
    fn test_store_and_probe() {
        let mut table = TranspositionTable::new(Side::South, 8);
        let mut sink = MemorySink::new();
        let e = entry(1, 4, Score::Won(Side::South));

        let outcome = table.store(e.clone(), &mut sink).unwrap();
        assert_eq!(outcome, StoreOutcome::Inserted);
        assert_eq!(table.probe(&e.key, None), Some(&e));
    }

    #[test]
    fn test_second_budget_replaces_first() {
        let mut table = TranspositionTable::new(Side::South, 8);
        let mut sink = MemorySink::new();
        let mut first = entry(1, 4, Score::Heuristic(3));
        first.budget = Some(2);
        let mut second = entry(1, 4, Score::Heuristic(-1));
        second.budget = Some(5);

        assert_eq!(table.store(first.clone(), &mut sink).unwrap(), StoreOutcome::Inserted);
        assert_eq!(table.store(second.clone(), &mut sink).unwrap(), StoreOutcome::Replaced);
        assert_eq!(table.len(), 1);
        assert!(table.probe(&first.key, Some(2)).is_none());
        assert_eq!(table.probe(&second.key, Some(5)), Some(&second));

        assert_eq!(table.flush(&mut sink).unwrap(), 1);
        assert_eq!(sink.records().collect::<Vec<_>>(), vec![&second]);
    }

    #[test]
    fn test_budget_must_match() {
        let mut table = TranspositionTable::new(Side::South, 8);
        let mut sink = MemorySink::new();
        let mut e = entry(1, 4, Score::Heuristic(3));
        e.budget = Some(2);
        table.store(e.clone(), &mut sink).unwrap();

        assert!(table.probe(&e.key, Some(2)).is_some());
        assert!(table.probe(&e.key, Some(3)).is_none());
        assert!(table.probe(&e.key, None).is_none());
    }

    #[test]
    fn test_losing_entries_skipped() {
        let mut table = TranspositionTable::new(Side::North, 8);
        let mut sink = MemorySink::new();
        let e = entry(1, 0, Score::Won(Side::South));

        assert_eq!(table.store(e.clone(), &mut sink).unwrap(), StoreOutcome::Skipped);
        assert!(table.is_empty());
        assert!(table.probe(&e.key, None).is_none());
    }

    #[test]
    fn test_capacity_flushes_sorted_batch() {
        let mut table = TranspositionTable::new(Side::South, 3);
        let mut sink = MemorySink::new();

        table.store(entry(1, 5, Score::Tied), &mut sink).unwrap();
        table.store(entry(2, 1, Score::Tied), &mut sink).unwrap();
        let outcome = table.store(entry(3, 3, Score::Tied), &mut sink).unwrap();

        assert_eq!(outcome, StoreOutcome::Flushed { written: 3 });
        assert!(table.is_empty());
        assert_eq!(table.batches(), 1);

        let (batch, entries) = &sink.batches[0];
        assert_eq!(*batch, 0);
        let depths: Vec<u32> = entries.iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![1, 3, 5]);
    }

    #[test]
    fn test_sort_is_stable_within_depth() {
        let mut table = TranspositionTable::new(Side::South, 10);
        let mut sink = MemorySink::new();
        table.store(entry(1, 2, Score::Tied), &mut sink).unwrap();
        table.store(entry(2, 1, Score::Tied), &mut sink).unwrap();
        table.store(entry(3, 2, Score::Tied), &mut sink).unwrap();
        table.flush(&mut sink).unwrap();

        let wells: Vec<u8> = sink.batches[0]
            .1
            .iter()
            .map(|e| e.key.to_board().unwrap().pit(0))
            .collect();
        assert_eq!(wells, vec![2, 1, 3]);
    }

    #[test]
    fn test_probe_after_sort() {
        let mut table = TranspositionTable::new(Side::South, 10);
        let mut sink = MemorySink::new();
        let deep = entry(1, 9, Score::Tied);
        let shallow = entry(2, 0, Score::Heuristic(-4));
        table.store(deep.clone(), &mut sink).unwrap();
        table.store(shallow.clone(), &mut sink).unwrap();
        table.sort_by_depth();

        assert_eq!(table.probe(&deep.key, None), Some(&deep));
        assert_eq!(table.probe(&shallow.key, None), Some(&shallow));
    }

    #[test]
    fn test_failed_flush_keeps_entries() {
        let mut table = TranspositionTable::new(Side::South, 10);
        table.store(entry(1, 0, Score::Tied), &mut MemorySink::new()).unwrap();

        assert!(table.flush(&mut Broken).is_err());
        assert_eq!(table.len(), 1);
        assert_eq!(table.batches(), 0);
    }

    #[test]
    fn test_empty_flush_writes_nothing() {
        let mut table = TranspositionTable::new(Side::South, 10);
        let mut sink = MemorySink::new();
        assert_eq!(table.flush(&mut sink).unwrap(), 0);
        assert!(sink.batches.is_empty());
    }
}
