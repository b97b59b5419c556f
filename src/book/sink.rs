use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::flat::FlatRecord;
use super::tree::encode_tree;
use super::BookError;
use crate::board::{RetainedTree, Side};
use crate::tt::{RecordSink, TableEntry};

/// `flat_<side>_<first move>_<batch>.txt`
#[must_use]
pub fn flat_file_name(perspective: Side, first_move: usize, batch: u32) -> String {
    format!("flat_{perspective}_{first_move}_{batch:04}.txt")
}

/// Perspective side named by a flat file name, if it has the
/// [`flat_file_name`] shape.
#[must_use]
pub fn flat_file_side(name: &str) -> Option<Side> {
    let (side, _) = name.strip_prefix("flat_")?.split_once('_')?;
    Side::BOTH
        .into_iter()
        .find(|candidate| candidate.to_string() == side)
}

/// `tree_<side>_<first move>_h<horizon>.txt`, `hx` for unbounded searches
#[must_use]
pub fn tree_file_name(perspective: Side, first_move: usize, horizon: Option<u32>) -> String {
    match horizon {
        Some(plies) => format!("tree_{perspective}_{first_move}_h{plies}.txt"),
        None => format!("tree_{perspective}_{first_move}_hx.txt"),
    }
}

/// Writes every flushed batch to its own flat file.
pub struct FlatFileSink {
    dir: PathBuf,
    perspective: Side,
    first_move: usize,
    files: Vec<PathBuf>,
}

impl FlatFileSink {
    pub fn new(dir: impl Into<PathBuf>, perspective: Side, first_move: usize) -> Self {
        FlatFileSink {
            dir: dir.into(),
            perspective,
            first_move,
            files: Vec::new(),
        }
    }

    /// Files written so far, in batch order
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }
}

impl RecordSink for FlatFileSink {
    fn write_batch(&mut self, batch: u32, entries: &[TableEntry]) -> io::Result<()> {
        let path = self
            .dir
            .join(flat_file_name(self.perspective, self.first_move, batch));
        let mut out = BufWriter::new(File::create(&path)?);
        for entry in entries {
            writeln!(out, "{}", FlatRecord::from(entry))?;
        }
        out.flush()?;

        log::debug!("wrote {} records to {}", entries.len(), path.display());
        self.files.push(path);
        Ok(())
    }
}

/// Keeps flushed batches in memory.
#[derive(Default)]
pub struct MemorySink {
    pub batches: Vec<(u32, Vec<TableEntry>)>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record written, in flush order
    pub fn records(&self) -> impl Iterator<Item = &TableEntry> {
        self.batches.iter().flat_map(|(_, entries)| entries.iter())
    }
}

impl RecordSink for MemorySink {
    fn write_batch(&mut self, batch: u32, entries: &[TableEntry]) -> io::Result<()> {
        self.batches.push((batch, entries.to_vec()));
        Ok(())
    }
}

/// Encode `tree` into `dir` under its book file name.
pub fn write_tree_file(
    dir: &Path,
    tree: &RetainedTree,
    first_move: usize,
    horizon: Option<u32>,
) -> Result<PathBuf, BookError> {
    let text = encode_tree(tree)?;
    let path = dir.join(tree_file_name(tree.perspective(), first_move, horizon));
    let mut out = BufWriter::new(File::create(&path)?);
    out.write_all(text.as_bytes())?;
    out.flush()?;

    log::debug!("wrote tree to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(flat_file_name(Side::South, 3, 12), "flat_south_3_0012.txt");
        assert_eq!(tree_file_name(Side::North, 9, Some(6)), "tree_north_9_h6.txt");
        assert_eq!(tree_file_name(Side::South, 0, None), "tree_south_0_hx.txt");
    }

    #[test]
    fn test_flat_file_side() {
        for side in Side::BOTH {
            assert_eq!(flat_file_side(&flat_file_name(side, 5, 2)), Some(side));
        }
        assert_eq!(flat_file_side("flat_east_1_0000.txt"), None);
        assert_eq!(flat_file_side("flat_s_1_0000.txt"), None);
        assert_eq!(flat_file_side("tree_south_1_h4.txt"), None);
        assert_eq!(flat_file_side("flat_south"), None);
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        let entry = TableEntry {
            depth: 1,
            key: crate::board::Board::new().key(),
            best_move: 4,
            score: crate::board::Score::Tied,
            budget: None,
        };
        sink.write_batch(0, &[entry.clone()]).unwrap();
        sink.write_batch(1, &[entry.clone(), entry]).unwrap();
        assert_eq!(sink.records().count(), 3);
        assert_eq!(sink.batches[1].0, 1);
    }
}
