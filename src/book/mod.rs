//! Book persistence.
//!
//! Two text shapes are written:
//! - flat files, one `depth;key;move;score` line per flushed table entry;
//! - tree files, the root score followed by the compact encoding of a
//!   retained best-line tree.

mod flat;
mod sink;
mod tree;

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::board::{KeyParseError, MoveError};
use crate::options::ConfigError;
use crate::partition::PartitionError;

pub use flat::{FlatBook, FlatRecord, RecordParseError, FIELD_SEPARATOR};
pub use sink::{
    flat_file_name, flat_file_side, tree_file_name, write_tree_file, FlatFileSink, MemorySink,
};
pub use tree::{decode_tree, encode_tree, ply_marker, TreeFormatError};

/// Error type for everything that can stop a book run
#[derive(Debug)]
pub enum BookError {
    Io(io::Error),
    /// First move rejected before searching
    Move(MoveError),
    Config(ConfigError),
    Partition(PartitionError),
    /// Malformed line in a flat book file
    Record { line: usize, error: RecordParseError },
    /// Flat file whose name does not say which side's book it holds
    UnknownBookFile { path: PathBuf },
    Tree(TreeFormatError),
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::Io(e) => write!(f, "I/O error: {e}"),
            BookError::Move(e) => write!(f, "Invalid first move: {e}"),
            BookError::Config(e) => write!(f, "Invalid configuration: {e}"),
            BookError::Partition(e) => write!(f, "Invalid partition: {e}"),
            BookError::Record { line, error } => {
                write!(f, "Bad record on line {line}: {error}")
            }
            BookError::Tree(e) => write!(f, "Bad tree encoding: {e}"),
            BookError::UnknownBookFile { path } => {
                write!(f, "Cannot tell the side of book file {}", path.display())
            }
        }
    }
}

impl std::error::Error for BookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BookError::Io(e) => Some(e),
            BookError::Move(e) => Some(e),
            BookError::Config(e) => Some(e),
            BookError::Partition(e) => Some(e),
            BookError::Record { error, .. } => Some(error),
            BookError::Tree(e) => Some(e),
            BookError::UnknownBookFile { .. } => None,
        }
    }
}

impl From<io::Error> for BookError {
    fn from(e: io::Error) -> Self {
        BookError::Io(e)
    }
}

impl From<MoveError> for BookError {
    fn from(e: MoveError) -> Self {
        BookError::Move(e)
    }
}

impl From<ConfigError> for BookError {
    fn from(e: ConfigError) -> Self {
        BookError::Config(e)
    }
}

impl From<PartitionError> for BookError {
    fn from(e: PartitionError) -> Self {
        BookError::Partition(e)
    }
}

impl From<TreeFormatError> for BookError {
    fn from(e: TreeFormatError) -> Self {
        BookError::Tree(e)
    }
}

impl From<KeyParseError> for RecordParseError {
    fn from(e: KeyParseError) -> Self {
        RecordParseError::InvalidKey(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Side;

    #[test]
    fn test_move_error_wraps() {
        let err: BookError = MoveError::EmptyWell { well: 4 }.into();
        assert!(err.to_string().contains("first move"));
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn test_record_error_names_line() {
        let err = BookError::Record {
            line: 12,
            error: RecordParseError::WrongFieldCount { found: 3 },
        };
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn test_source_is_inner_error() {
        use std::error::Error;
        let err: BookError = MoveError::WrongSide {
            well: 9,
            side: Side::South,
        }
        .into();
        assert!(err.source().is_some());
    }
}
