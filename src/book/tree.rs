//! Compact text encoding of retained trees.
//!
//! The first line holds the root score. The body walks the tree depth
//! first: a perspective-side move is written as its relative well digit,
//! an opponent move as the base-36 ply of the opponent node followed by the
//! digit. The first reply of an opponent node continues the current line;
//! every further reply starts a new line with its ply marker, which names the
//! opponent node on the current path it hangs from.

use std::fmt;

use crate::board::{Board, NodeId, RetainedTree, Score, Side, WELLS_PER_SIDE};

/// Base-36 marker for an opponent node at `ply`
#[must_use]
pub fn ply_marker(ply: u32) -> Option<char> {
    std::char::from_digit(ply, 36)
}

/// Error type for tree encoding and decoding failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeFormatError {
    /// Empty input
    MissingHeader,
    BadScore { found: String },
    /// Opponent node too deep for a one-character marker
    PlyTooDeep { ply: u32 },
    /// Marker does not name an opponent node on the current path
    UnknownPly { line: usize, found: char },
    /// Marker does not match the ply of the node being extended
    BadMarker { line: usize, expected: u32, found: char },
    /// Line ends between a marker and its digit
    UnexpectedEnd { line: usize },
    BadDigit { line: usize, found: char },
    /// Move cannot be played in the replayed position
    IllegalMove { line: usize, well: usize },
    /// Perspective node given a second move
    DuplicateMove { line: usize, well: usize },
}

impl fmt::Display for TreeFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeFormatError::MissingHeader => write!(f, "Missing score line"),
            TreeFormatError::BadScore { found } => write!(f, "Invalid root score '{found}'"),
            TreeFormatError::PlyTooDeep { ply } => {
                write!(f, "Opponent node at ply {ply} cannot be marked")
            }
            TreeFormatError::UnknownPly { line, found } => {
                write!(f, "Line {line}: marker '{found}' names no opponent node")
            }
            TreeFormatError::BadMarker {
                line,
                expected,
                found,
            } => write!(f, "Line {line}: expected marker for ply {expected}, found '{found}'"),
            TreeFormatError::UnexpectedEnd { line } => {
                write!(f, "Line {line}: marker without move")
            }
            TreeFormatError::BadDigit { line, found } => {
                write!(f, "Line {line}: invalid move digit '{found}'")
            }
            TreeFormatError::IllegalMove { line, well } => {
                write!(f, "Line {line}: well {well} cannot be played")
            }
            TreeFormatError::DuplicateMove { line, well } => {
                write!(f, "Line {line}: second move {well} for the book side")
            }
        }
    }
}

impl std::error::Error for TreeFormatError {}

/// Encode `tree` as text.
pub fn encode_tree(tree: &RetainedTree) -> Result<String, TreeFormatError> {
    let mut out = match tree.score() {
        Some(score) => score.to_string(),
        None => "?".to_string(),
    };
    out.push('\n');

    let mut body = String::new();
    write_children(tree, tree.root(), &mut body)?;
    if !body.is_empty() {
        out.push_str(&body);
        out.push('\n');
    }
    Ok(out)
}

fn write_children(tree: &RetainedTree, id: NodeId, out: &mut String) -> Result<(), TreeFormatError> {
    let arena = tree.arena();
    let node = arena.node(id);
    for (idx, (slot, child)) in arena.children(id).enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        if node.side != tree.perspective() {
            let marker = ply_marker(node.ply).ok_or(TreeFormatError::PlyTooDeep { ply: node.ply })?;
            out.push(marker);
        }
        out.push(char::from(b'0' + slot as u8));
        write_children(tree, child, out)?;
    }
    Ok(())
}

/// Rebuild a tree from [`encode_tree`] output by replaying its moves from
/// `board` with `to_move` to play.
pub fn decode_tree(
    text: &str,
    board: Board,
    to_move: Side,
    perspective: Side,
) -> Result<RetainedTree, TreeFormatError> {
    let mut lines = text.lines();
    let header = lines.next().ok_or(TreeFormatError::MissingHeader)?.trim();
    let score = match header {
        "?" => None,
        s => Some(
            s.parse::<Score>()
                .map_err(|e| TreeFormatError::BadScore { found: e.found })?,
        ),
    };

    let mut tree = RetainedTree::with_root(board, to_move, perspective, score);
    let mut path: Vec<(NodeId, Board, Side, u32)> = vec![(tree.root(), board, to_move, 0)];
    let mut started = false;

    for (idx, text_line) in lines.enumerate() {
        let line = idx + 2;
        let text_line = text_line.trim_end();
        if text_line.is_empty() {
            continue;
        }
        let mut chars = text_line.chars().peekable();

        if started {
            let Some(&marker) = chars.peek() else {
                continue;
            };
            let ply = marker
                .to_digit(36)
                .ok_or(TreeFormatError::UnknownPly { line, found: marker })?;
            match path.get(ply as usize) {
                Some(&(_, _, side, _)) if side != perspective => path.truncate(ply as usize + 1),
                _ => return Err(TreeFormatError::UnknownPly { line, found: marker }),
            }
        }
        started = true;

        while let Some(c) = chars.next() {
            let Some(&(id, node_board, side, ply)) = path.last() else {
                return Err(TreeFormatError::UnknownPly { line, found: c });
            };

            let digit = if side == perspective {
                c
            } else {
                if c.to_digit(36) != Some(ply) {
                    return Err(TreeFormatError::BadMarker {
                        line,
                        expected: ply,
                        found: c,
                    });
                }
                chars.next().ok_or(TreeFormatError::UnexpectedEnd { line })?
            };

            let slot = digit
                .to_digit(10)
                .map(|d| d as usize)
                .filter(|&d| d < WELLS_PER_SIDE)
                .ok_or(TreeFormatError::BadDigit { line, found: digit })?;
            let well = side.first_well() + slot;

            if side == perspective && tree.arena().children(id).next().is_some() {
                return Err(TreeFormatError::DuplicateMove { line, well });
            }
            let sown = node_board
                .apply_move(well, side)
                .map_err(|_| TreeFormatError::IllegalMove { line, well })?;

            let next = sown.next_to_move();
            let arena = tree.arena_mut();
            let child = arena.alloc(next, ply + 1);
            arena.attach(id, slot, child);
            path.push((child, sown.board, next, ply + 1));
        }
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        assert_eq!(ply_marker(0), Some('0'));
        assert_eq!(ply_marker(10), Some('a'));
        assert_eq!(ply_marker(35), Some('z'));
        assert_eq!(ply_marker(36), None);
    }

    #[test]
    fn test_header_only() {
        let tree = decode_tree("-1\n", Board::new(), Side::North, Side::South).unwrap();
        assert_eq!(tree.score(), Some(Score::Won(Side::North)));
        assert_eq!(tree.lines(), vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_decode_branches() {
        // North at ply 0 replies with wells 9 and 10; South answers the first.
        let text = "1\n013\n02\n";
        let tree = decode_tree(text, Board::new(), Side::North, Side::South).unwrap();
        assert_eq!(tree.lines(), vec![vec![9, 3], vec![10]]);
    }

    #[test]
    fn test_encode_matches_decode() {
        let text = "1\n013\n02\n";
        let tree = decode_tree(text, Board::new(), Side::North, Side::South).unwrap();
        assert_eq!(encode_tree(&tree).unwrap(), text);
    }

    #[test]
    fn test_decode_errors() {
        let board = Board::new();
        assert_eq!(
            decode_tree("", board, Side::North, Side::South).err(),
            Some(TreeFormatError::MissingHeader)
        );
        assert!(matches!(
            decode_tree("win\n", board, Side::North, Side::South),
            Err(TreeFormatError::BadScore { .. })
        ));
        assert!(matches!(
            decode_tree("1\n10\n", board, Side::North, Side::South),
            Err(TreeFormatError::BadMarker { line: 2, expected: 0, .. })
        ));
        assert!(matches!(
            decode_tree("1\n0\n", board, Side::North, Side::South),
            Err(TreeFormatError::UnexpectedEnd { line: 2 })
        ));
        assert!(matches!(
            decode_tree("1\n08\n", board, Side::North, Side::South),
            Err(TreeFormatError::BadDigit { found: '8', .. })
        ));
        assert!(matches!(
            decode_tree("1\n013\n5\n", board, Side::North, Side::South),
            Err(TreeFormatError::UnknownPly { line: 3, .. })
        ));
    }
}
