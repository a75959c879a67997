//! Removal: best-effort leaf erase.
//!
//! `remove` deletes the entry from the leaf that would contain it and stops
//! there: no sibling borrowing, no merging, no root collapse. Nodes may end
//! up arbitrarily underfilled (even empty) yet stay reachable through their
//! separators; balance guarantees come from the insert path alone.

use crate::types::BPlusTree;

impl<'arena, K: Copy + Ord, V: Copy, const M: usize> BPlusTree<'arena, K, V, M> {
    /// Remove `key`, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::{Arena, BPlusTree};
    ///
    /// let arena = Arena::new(BPlusTree::<i32, i32, 16>::arena_capacity_for(32)).unwrap();
    /// let mut tree = BPlusTree::<i32, i32, 16>::new(&arena).unwrap();
    /// tree.insert(3, 30).unwrap();
    /// assert_eq!(tree.remove(&3), Some(30));
    /// assert_eq!(tree.remove(&3), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut node = self.root;
        loop {
            let n = self.node(node);
            if n.is_leaf() {
                break;
            }
            let idx = n.key_slice().partition_point(|probe| probe <= key);
            // SAFETY: idx <= len, the descent index.
            node = unsafe { n.child_at(idx) };
        }

        // SAFETY: no other reference to this node is live.
        let n = unsafe { node.as_mut() };
        let mut found = None;
        for (idx, probe) in n.key_slice().iter().enumerate() {
            if probe == key {
                found = Some(idx);
                break;
            }
            if probe > key {
                break;
            }
        }
        let idx = found?;
        // SAFETY: idx indexes the live prefix of the leaf.
        Some(unsafe { n.leaf_remove_at(idx) })
    }
}
