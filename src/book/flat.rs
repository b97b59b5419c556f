use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::BookError;
use super::sink::flat_file_side;
use crate::board::{Board, KeyParseError, Score, Side, StateKey, PITS};
use crate::tt::TableEntry;

/// Separator between the fields of a flat record line
pub const FIELD_SEPARATOR: char = ';';

/// One line of a flat book: `depth;key;move;score`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlatRecord {
    pub depth: u32,
    pub key: String,
    pub best_move: u8,
    pub score: Score,
}

impl FlatRecord {
    /// Board the record describes.
    pub fn board(&self) -> Result<Board, KeyParseError> {
        self.key.parse::<Board>()
    }
}

impl From<&TableEntry> for FlatRecord {
    fn from(entry: &TableEntry) -> Self {
        FlatRecord {
            depth: entry.depth,
            key: entry.key.to_string(),
            best_move: entry.best_move,
            score: entry.score,
        }
    }
}

impl fmt::Display for FlatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = FIELD_SEPARATOR;
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.depth, self.key, self.best_move, self.score
        )
    }
}

/// Error type for flat record parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    /// Line does not have exactly four fields
    WrongFieldCount { found: usize },
    InvalidDepth { field: String },
    InvalidKey(KeyParseError),
    InvalidMove { field: String },
    InvalidScore { field: String },
}

impl fmt::Display for RecordParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordParseError::WrongFieldCount { found } => {
                write!(f, "Record must have 4 fields, found {found}")
            }
            RecordParseError::InvalidDepth { field } => write!(f, "Invalid depth '{field}'"),
            RecordParseError::InvalidKey(e) => write!(f, "{e}"),
            RecordParseError::InvalidMove { field } => write!(f, "Invalid move '{field}'"),
            RecordParseError::InvalidScore { field } => write!(f, "Invalid score '{field}'"),
        }
    }
}

impl std::error::Error for RecordParseError {}

impl FromStr for FlatRecord {
    type Err = RecordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(FIELD_SEPARATOR).collect();
        let &[depth, key, best_move, score] = fields.as_slice() else {
            return Err(RecordParseError::WrongFieldCount {
                found: fields.len(),
            });
        };

        let depth = depth
            .parse::<u32>()
            .map_err(|_| RecordParseError::InvalidDepth {
                field: depth.to_string(),
            })?;
        let key = key.parse::<StateKey>()?.to_string();
        let best_move = best_move
            .parse::<u8>()
            .ok()
            .filter(|&well| (well as usize) < PITS)
            .ok_or_else(|| RecordParseError::InvalidMove {
                field: best_move.to_string(),
            })?;
        let score = score
            .parse::<Score>()
            .map_err(|e| RecordParseError::InvalidScore { field: e.found })?;

        Ok(FlatRecord {
            depth,
            key,
            best_move,
            score,
        })
    }
}

/// Lookup table rebuilt from flat book files.
///
/// A flat book only holds positions with its perspective side to move, and
/// the key leaves the side out, so records are kept apart per side.
#[derive(Default)]
pub struct FlatBook {
    entries: HashMap<(Side, String), FlatRecord>,
}

impl FlatBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every file in `paths`, taking each file's side from its name.
    /// When a position appears more than once for a side the shallowest
    /// record wins.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, BookError> {
        let mut book = FlatBook::new();
        for path in paths {
            let path = path.as_ref();
            let side = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(flat_file_side)
                .ok_or_else(|| BookError::UnknownBookFile {
                    path: path.to_path_buf(),
                })?;
            let file = File::open(path)?;
            book.read(side, BufReader::new(file))?;
            log::debug!(
                "loaded {} for {side}, book now holds {} positions",
                path.display(),
                book.len()
            );
        }
        Ok(book)
    }

    /// Merge the records of one flat file written for `side`. Blank lines
    /// are ignored.
    pub fn read<R: BufRead>(&mut self, side: Side, reader: R) -> Result<(), BookError> {
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = line
                .parse::<FlatRecord>()
                .map_err(|error| BookError::Record {
                    line: idx + 1,
                    error,
                })?;
            self.insert(side, record);
        }
        Ok(())
    }

    pub fn insert(&mut self, side: Side, record: FlatRecord) {
        let slot = (side, record.key.clone());
        match self.entries.get(&slot) {
            Some(existing) if existing.depth <= record.depth => {}
            _ => {
                self.entries.insert(slot, record);
            }
        }
    }

    /// Record for `board` with `to_move` to play, if that side's book has one.
    #[must_use]
    pub fn probe(&self, board: &Board, to_move: Side) -> Option<&FlatRecord> {
        self.entries.get(&(to_move, board.key().to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
