//! Retained best-line trees.
//!
//! Nodes live in an index arena. Released subtrees hand their slots back to
//! a free list, so a long search reuses a bounded amount of memory while the
//! compactor throws away everything that is not worth keeping:
//! - at a perspective-side node only the child of the chosen move survives;
//! - at an opponent node every reply survives while the node's ply is below
//!   the reply horizon, and none beyond it.

use crate::board::{Board, Score, Side, WELLS_PER_SIDE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct TreeNode {
    /// Side to move at this node
    pub side: Side,
    /// Ply from the tree root
    pub ply: u32,
    pub score: Option<Score>,
    children: [Option<NodeId>; WELLS_PER_SIDE],
}

#[derive(Default)]
pub struct TreeArena {
    nodes: Vec<TreeNode>,
    free: Vec<NodeId>,
}

impl TreeArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, side: Side, ply: u32) -> NodeId {
        let node = TreeNode {
            side,
            ply,
            score: None,
            children: [None; WELLS_PER_SIDE],
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId((self.nodes.len() - 1) as u32)
            }
        }
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.index()]
    }

    pub fn set_score(&mut self, id: NodeId, score: Score) {
        self.nodes[id.index()].score = Some(score);
    }

    /// Hang `child` under `parent` at relative well `slot`, releasing
    /// whatever was there before.
    pub fn attach(&mut self, parent: NodeId, slot: usize, child: NodeId) {
        if let Some(old) = self.nodes[parent.index()].children[slot].replace(child) {
            self.release_subtree(old);
        }
    }

    /// Detach and release the child at `slot`, if any.
    pub fn prune(&mut self, parent: NodeId, slot: usize) {
        if let Some(old) = self.nodes[parent.index()].children[slot].take() {
            self.release_subtree(old);
        }
    }

    #[must_use]
    pub fn child(&self, id: NodeId, slot: usize) -> Option<NodeId> {
        self.nodes[id.index()].children[slot]
    }

    /// Attached children as (relative well, node), in well order
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.nodes[id.index()]
            .children
            .iter()
            .enumerate()
            .filter_map(|(slot, child)| child.map(|c| (slot, c)))
    }

    /// Return `root` and everything below it to the free list.
    pub fn release_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id.index()];
            stack.extend(node.children.iter_mut().filter_map(Option::take));
            node.score = None;
            self.free.push(id);
        }
    }

    /// Nodes currently in use
    #[must_use]
    pub fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Slots ever allocated
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.nodes.len()
    }
}

/// Applies the retention policy while the search folds child results.
pub struct Compactor {
    arena: TreeArena,
    perspective: Side,
    reply_horizon: u32,
}

impl Compactor {
    #[must_use]
    pub fn new(perspective: Side, reply_horizon: u32) -> Self {
        Compactor {
            arena: TreeArena::new(),
            perspective,
            reply_horizon,
        }
    }

    /// Whether the children of a node with `side` to move at `ply` are kept
    #[must_use]
    pub fn keeps_children(&self, side: Side, ply: u32) -> bool {
        side == self.perspective || ply < self.reply_horizon
    }

    pub fn open(&mut self, side: Side, ply: u32) -> NodeId {
        self.arena.alloc(side, ply)
    }

    /// Fold a resolved child into `parent`. `improved` says whether the
    /// child's move became the parent's best move.
    pub fn fold(&mut self, parent: NodeId, well: usize, child: NodeId, improved: bool) {
        let (side, ply) = {
            let node = self.arena.node(parent);
            (node.side, node.ply)
        };
        let slot = well - side.first_well();

        if side == self.perspective {
            if improved {
                for old in 0..WELLS_PER_SIDE {
                    if old != slot {
                        self.arena.prune(parent, old);
                    }
                }
                self.arena.attach(parent, slot, child);
            } else {
                self.arena.release_subtree(child);
            }
        } else if ply < self.reply_horizon {
            self.arena.attach(parent, slot, child);
        } else {
            self.arena.release_subtree(child);
        }
    }

    pub fn close(&mut self, id: NodeId, score: Score) {
        self.arena.set_score(id, score);
    }

    #[must_use]
    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    pub(crate) fn finish(self, root: NodeId, board: Board, to_move: Side) -> RetainedTree {
        log::trace!(
            "retained tree: {} live nodes, {} allocated",
            self.arena.live(),
            self.arena.high_water()
        );
        RetainedTree {
            arena: self.arena,
            root,
            board,
            to_move,
            perspective: self.perspective,
        }
    }
}

/// The compacted tree a search leaves behind.
pub struct RetainedTree {
    pub(crate) arena: TreeArena,
    pub(crate) root: NodeId,
    pub(crate) board: Board,
    pub(crate) to_move: Side,
    pub(crate) perspective: Side,
}

impl RetainedTree {
    /// Tree with a single unexpanded root, used when decoding.
    #[must_use]
    pub fn with_root(board: Board, to_move: Side, perspective: Side, score: Option<Score>) -> Self {
        let mut arena = TreeArena::new();
        let root = arena.alloc(to_move, 0);
        if let Some(score) = score {
            arena.set_score(root, score);
        }
        RetainedTree {
            arena,
            root,
            board,
            to_move,
            perspective,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    pub(crate) fn arena_mut(&mut self) -> &mut TreeArena {
        &mut self.arena
    }

    #[must_use]
    pub fn board(&self) -> Board {
        self.board
    }

    #[must_use]
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    #[must_use]
    pub fn perspective(&self) -> Side {
        self.perspective
    }

    #[must_use]
    pub fn score(&self) -> Option<Score> {
        self.arena.node(self.root).score
    }

    /// Every root-to-leaf path as absolute well indices, depth first.
    #[must_use]
    pub fn lines(&self) -> Vec<Vec<usize>> {
        let mut lines = Vec::new();
        let mut path = Vec::new();
        self.collect_lines(self.root, &mut path, &mut lines);
        lines
    }

    fn collect_lines(&self, id: NodeId, path: &mut Vec<usize>, lines: &mut Vec<Vec<usize>>) {
        let node = self.arena.node(id);
        let mut leaf = true;
        for (slot, child) in self.arena.children(id) {
            leaf = false;
            path.push(node.side.first_well() + slot);
            self.collect_lines(child, path, lines);
            path.pop();
        }
        if leaf {
            lines.push(path.clone());
        }
    }
}
