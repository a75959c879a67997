//! Invariant checking and debugging utilities.
//!
//! The walk verifies, for every reachable node: strict key ordering, the
//! capacity bound, separator bounds (each child's keys fall in the half-open
//! window its separators define; the separator itself may reappear as the
//! first key of the right subtree), and uniform leaf depth. Minimum fill is
//! deliberately not checked: removal never rebalances, so arbitrarily
//! underfilled nodes are a legal state.

use crate::types::{BPlusTree, NodeRef};

impl<'arena, K: Copy + Ord, V: Copy, const M: usize> BPlusTree<'arena, K, V, M> {
    /// Check if the tree maintains its invariants.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with a description of the first violation found.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        let mut leaf_depth = None;
        self.validate_node(self.root, None, None, 0, &mut leaf_depth)
    }

    fn validate_node(
        &self,
        node: NodeRef<K, V, M>,
        lower: Option<K>,
        upper: Option<K>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
    ) -> Result<(), String> {
        let n = self.node(node);
        let keys = n.key_slice();

        if keys.len() > M {
            return Err(format!(
                "node holds {} keys but fan-out is {}",
                keys.len(),
                M
            ));
        }
        for pair in keys.windows(2) {
            if pair[0] >= pair[1] {
                return Err(format!("keys not strictly increasing at depth {}", depth));
            }
        }
        if let (Some(low), Some(first)) = (lower, keys.first()) {
            // Lower bounds are inclusive: a copied-up separator equals the
            // first key of its right subtree.
            if *first < low {
                return Err(format!("key below its separator window at depth {}", depth));
            }
        }
        if let (Some(high), Some(last)) = (upper, keys.last()) {
            if *last >= high {
                return Err(format!(
                    "key reaches its upper separator at depth {}",
                    depth
                ));
            }
        }

        if n.is_leaf() {
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(format!(
                        "unbalanced: leaf at depth {} while another sits at {}",
                        depth, expected
                    ));
                }
                _ => {}
            }
            return Ok(());
        }

        if keys.is_empty() {
            return Err(format!("internal node without separators at depth {}", depth));
        }
        for idx in 0..=keys.len() {
            // SAFETY: child indices 0..=len are valid in an internal node.
            let child = unsafe { n.child_at(idx) };
            let child_lower = if idx == 0 { lower } else { Some(keys[idx - 1]) };
            let child_upper = if idx == keys.len() {
                upper
            } else {
                Some(keys[idx])
            };
            self.validate_node(child, child_lower, child_upper, depth + 1, leaf_depth)?;
        }
        Ok(())
    }
}
