pub mod board;
pub mod book;
pub mod options;
pub mod partition;
pub mod tt;

pub use board::{Board, Score, SearchParams, Side, Solver};
pub use book::{BookError, FlatBook};
pub use options::BookOptions;
pub use partition::{BookRun, Partition};
pub use tt::TranspositionTable;
