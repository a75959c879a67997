//! Construction and arena-sizing helpers for the tree.

use crate::arena::Arena;
use crate::error::{BPlusTreeError, InitResult};
use crate::types::{BPlusTree, Node, MIN_FANOUT};

impl<'arena, K: Copy + Ord, V: Copy, const M: usize> BPlusTree<'arena, K, V, M> {
    /// Arena footprint of a single node of this tree, including cache-line
    /// rounding.
    pub const NODE_BYTES: usize = Node::<K, V, M>::BYTES;

    /// Create an empty tree whose nodes live in `arena`.
    ///
    /// The root starts as an empty leaf, so one node is allocated up front.
    /// Returns `ArenaUnavailable` for an arena with no usable storage and
    /// `OutOfArena` if the root leaf does not fit.
    ///
    /// # Panics
    ///
    /// Panics if `M < 4` (the split arithmetic needs non-empty halves) or if
    /// `M` exceeds the node key-count range. Fan-out is a compile-time
    /// parameter, so a bad value is a programming error, not a runtime
    /// condition.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::{Arena, BPlusTree};
    ///
    /// let arena = Arena::new(BPlusTree::<i32, i32, 16>::arena_capacity_for(32)).unwrap();
    /// let tree = BPlusTree::<i32, i32, 16>::new(&arena).unwrap();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new(arena: &'arena Arena) -> InitResult<Self> {
        assert!(
            M >= MIN_FANOUT,
            "fan-out {} too small, minimum is {}",
            M,
            MIN_FANOUT
        );
        assert!(M <= u16::MAX as usize, "fan-out {} exceeds key-count range", M);
        if arena.capacity() == 0 {
            return Err(BPlusTreeError::ArenaUnavailable);
        }
        let root = Node::new_leaf_in(arena)?;
        Ok(Self { arena, root })
    }

    /// Bytes of arena capacity needed to hold `nodes` nodes of this tree.
    pub const fn arena_capacity_for(nodes: usize) -> usize {
        nodes * Self::NODE_BYTES
    }

    /// The arena this tree allocates from.
    pub fn arena(&self) -> &'arena Arena {
        self.arena
    }
}
