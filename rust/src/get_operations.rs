//! Point lookups: the three find variants and their conveniences.
//!
//! All variants share one descent rule: at an internal node, descend into
//! the child at the first separator strictly greater than the key; with no
//! such separator, take the rightmost child. A key equal to a separator
//! therefore goes right, which is what copy-up separators require. The
//! variants differ only in how they probe a node's key array and must be
//! observationally indistinguishable on any valid tree.

use std::cmp::Ordering;

use crate::simd::{self, SimdKey};
use crate::types::{BPlusTree, Node, NodeRef};

impl<'arena, K: Copy + Ord, V: Copy, const M: usize> BPlusTree<'arena, K, V, M> {
    /// Borrow a node of this tree.
    #[inline]
    pub(crate) fn node(&self, node: NodeRef<K, V, M>) -> &Node<K, V, M> {
        // SAFETY: every NodeRef reachable from this tree was allocated from
        // `self.arena`, which outlives `&self`; the arena never frees or
        // moves blocks, and resetting it requires exclusive access, which
        // this borrow excludes.
        unsafe { node.as_ref() }
    }

    /// Look up `key` by scanning each node left to right.
    ///
    /// Branch-predictor friendly when few keys are live per node.
    pub fn find_linear(&self, key: &K) -> Option<V> {
        let mut node = self.root;
        loop {
            let n = self.node(node);
            let keys = n.key_slice();
            if n.is_leaf() {
                for (idx, probe) in keys.iter().enumerate() {
                    match probe.cmp(key) {
                        // SAFETY: idx indexes the live prefix of a leaf.
                        Ordering::Equal => return Some(unsafe { n.value_at(idx) }),
                        Ordering::Greater => return None,
                        Ordering::Less => {}
                    }
                }
                return None;
            }
            let mut idx = keys.len();
            for (i, probe) in keys.iter().enumerate() {
                if probe > key {
                    idx = i;
                    break;
                }
            }
            // SAFETY: idx <= len, the descent index of an internal node.
            node = unsafe { n.child_at(idx) };
        }
    }

    /// Look up `key` with lower-bound binary search per node.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::{Arena, BPlusTree};
    ///
    /// let arena = Arena::new(BPlusTree::<i32, i32, 16>::arena_capacity_for(32)).unwrap();
    /// let mut tree = BPlusTree::<i32, i32, 16>::new(&arena).unwrap();
    /// tree.insert(1, 10).unwrap();
    /// assert_eq!(tree.find_binary(&1), Some(10));
    /// assert_eq!(tree.find_binary(&2), None);
    /// ```
    pub fn find_binary(&self, key: &K) -> Option<V> {
        let mut node = self.root;
        loop {
            let n = self.node(node);
            let keys = n.key_slice();
            if n.is_leaf() {
                let idx = keys.binary_search(key).ok()?;
                // SAFETY: binary_search returned an index into the live
                // prefix of a leaf.
                return Some(unsafe { n.value_at(idx) });
            }
            let idx = keys.partition_point(|probe| probe <= key);
            // SAFETY: partition_point <= len, the descent index.
            node = unsafe { n.child_at(idx) };
        }
    }

    /// Look up `key`. Alias for the binary variant.
    pub fn get(&self, key: &K) -> Option<V> {
        self.find_binary(key)
    }

    /// Check if `key` exists in the tree.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<'arena, K: SimdKey, V: Copy, const M: usize> BPlusTree<'arena, K, V, M> {
    /// Look up `key` with the vectorized probes of [`SimdKey`], prefetching
    /// each child node before descending into it.
    ///
    /// For `i32` keys on AVX2 hosts the probes compare 8 keys per packed
    /// comparison; for other supported key types (or without AVX2) they are
    /// the binary probes, so results always match
    /// [`find_binary`](Self::find_binary).
    pub fn find_simd(&self, key: &K) -> Option<V> {
        let mut node = self.root;
        loop {
            let n = self.node(node);
            let len = n.len();
            if n.is_leaf() {
                // SAFETY: keys_ptr covers len initialized entries and the
                // key array is padded to chunk granularity.
                let idx = unsafe { K::locate(n.keys_ptr(), len, key) }?;
                // SAFETY: locate returned an index into the live prefix.
                return Some(unsafe { n.value_at(idx) });
            }
            // SAFETY: as above; the result is <= len by contract.
            let idx = unsafe { K::descend_index(n.keys_ptr(), len, key) };
            // SAFETY: idx <= len, the descent index.
            let child = unsafe { n.child_at(idx) };
            simd::prefetch_node(child.as_raw());
            node = child;
        }
    }
}
