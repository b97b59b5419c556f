//! Error types for board operations.

use std::fmt;

use super::types::{Side, PITS};

/// Error type for rejected move requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Index is not a board slot at all
    OutOfRange { well: usize },
    /// Slot is a store or belongs to the other side
    WrongSide { well: usize, side: Side },
    /// Well holds no seeds
    EmptyWell { well: usize },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::OutOfRange { well } => {
                write!(f, "Well {well} out of range (must be below {PITS})")
            }
            MoveError::WrongSide { well, side } => {
                write!(f, "Slot {well} is not one of {side}'s wells")
            }
            MoveError::EmptyWell { well } => write!(f, "Well {well} is empty"),
        }
    }
}

impl std::error::Error for MoveError {}

/// Error type for canonical key parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    /// Key does not hold exactly sixteen counters
    WrongLength { found: usize },
    /// Counter is not a small non-negative integer
    InvalidCounter { field: String },
}

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyParseError::WrongLength { found } => {
                write!(f, "State key must have {PITS} counters, found {found}")
            }
            KeyParseError::InvalidCounter { field } => {
                write!(f, "Invalid counter '{field}' in state key")
            }
        }
    }
}

impl std::error::Error for KeyParseError {}

/// Error type for unrecognised side names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideParseError {
    pub found: String,
}

impl fmt::Display for SideParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown side '{}' (expected south or north)", self.found)
    }
}

impl std::error::Error for SideParseError {}

/// Error type for score tokens other than `1`, `-1`, `0` or `h<diff>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreParseError {
    pub found: String,
}

impl fmt::Display for ScoreParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid score '{}'", self.found)
    }
}

impl std::error::Error for ScoreParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_out_of_range() {
        let err = MoveError::OutOfRange { well: 16 };
        assert!(err.to_string().contains("16"));
    }

    #[test]
    fn test_move_error_wrong_side() {
        let err = MoveError::WrongSide {
            well: 9,
            side: Side::South,
        };
        assert!(err.to_string().contains('9'));
        assert!(err.to_string().contains("south"));
    }

    #[test]
    fn test_move_error_empty() {
        let err = MoveError::EmptyWell { well: 3 };
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_key_error_wrong_length() {
        let err = KeyParseError::WrongLength { found: 15 };
        assert!(err.to_string().contains("15"));
    }

    #[test]
    fn test_key_error_invalid_counter() {
        let err = KeyParseError::InvalidCounter {
            field: "x1".to_string(),
        };
        assert!(err.to_string().contains("'x1'"));
    }

    #[test]
    fn test_token_errors() {
        let err = SideParseError {
            found: "east".to_string(),
        };
        assert!(err.to_string().contains("'east'"));
        let err = ScoreParseError {
            found: "h".to_string(),
        };
        assert!(err.to_string().contains("'h'"));
    }
}
