//! Insertion: upsert with recursive split propagation and root growth.
//!
//! Splits fire when a node reaches `M` keys, immediately after the write
//! that filled it; leaf splits copy the right half's first key up as the
//! separator, internal splits move the middle key up. A root split raises
//! the tree by one level.
//!
//! Failure atomicity: descent tracks the run of consecutive one-below-full
//! nodes ending at the leaf, which is exactly the set of nodes this insert
//! can split. Arena headroom for that many allocations (plus a root node if
//! the run spans the whole path) is verified before the first write, so an
//! insert that returns `OutOfArena` has not touched the tree.

use crate::error::{BPlusTreeError, BTreeResult};
use crate::types::{BPlusTree, InsertResult, Node, NodeRef};

impl<'arena, K: Copy + Ord, V: Copy, const M: usize> BPlusTree<'arena, K, V, M> {
    /// Map `key` to `value`, replacing and returning the previous value if
    /// the key already exists.
    ///
    /// Fails with `OutOfArena` when the arena cannot hold the nodes a split
    /// would need; the tree is left unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::{Arena, BPlusTree};
    ///
    /// let arena = Arena::new(BPlusTree::<i32, i32, 16>::arena_capacity_for(32)).unwrap();
    /// let mut tree = BPlusTree::<i32, i32, 16>::new(&arena).unwrap();
    /// assert_eq!(tree.insert(42, 1).unwrap(), None);
    /// assert_eq!(tree.insert(42, 2).unwrap(), Some(1));
    /// assert_eq!(tree.get(&42), Some(2));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> BTreeResult<Option<V>> {
        match self.insert_rec(self.root, key, value, 0, 0)? {
            InsertResult::Updated(old) => Ok(old),
            InsertResult::Split {
                old_value,
                separator_key,
                new_right,
            } => {
                let new_root = Node::new_branch_in(self.arena)?;
                // SAFETY: new_root is a fresh empty branch; root and
                // new_right are live nodes of this tree.
                unsafe {
                    new_root
                        .as_mut()
                        .branch_init_root(separator_key, self.root, new_right);
                }
                self.root = new_root;
                Ok(old_value)
            }
        }
    }

    /// Recursive descent. `full_run` counts the consecutive one-below-full
    /// ancestors directly above `node`; `depth` is the number of ancestors.
    fn insert_rec(
        &mut self,
        node: NodeRef<K, V, M>,
        key: K,
        value: V,
        full_run: usize,
        depth: usize,
    ) -> BTreeResult<InsertResult<K, V, M>> {
        if self.node(node).is_leaf() {
            return self.leaf_insert(node, key, value, full_run, depth);
        }

        let (idx, child, child_run) = {
            let n = self.node(node);
            let idx = n.key_slice().partition_point(|probe| probe <= &key);
            let child_run = if n.len() == M - 1 { full_run + 1 } else { 0 };
            // SAFETY: idx <= len, the descent index.
            (idx, unsafe { n.child_at(idx) }, child_run)
        };

        match self.insert_rec(child, key, value, child_run, depth + 1)? {
            InsertResult::Updated(old) => Ok(InsertResult::Updated(old)),
            InsertResult::Split {
                old_value,
                separator_key,
                new_right,
            } => {
                // SAFETY: no other reference to this node is live; the child
                // borrow from descent has ended.
                let n = unsafe { node.as_mut() };
                // SAFETY: idx was this key's descent index and len < M held
                // on the way down (a full node would have split then).
                unsafe { n.branch_insert_at(idx, separator_key, new_right) };
                if n.len() >= M {
                    let right = Node::new_branch_in(self.arena)?;
                    // SAFETY: n is full, right is a fresh empty branch.
                    let promoted = unsafe { n.split_branch_into(right.as_mut()) };
                    Ok(InsertResult::Split {
                        old_value,
                        separator_key: promoted,
                        new_right: right,
                    })
                } else {
                    Ok(InsertResult::Updated(old_value))
                }
            }
        }
    }

    fn leaf_insert(
        &mut self,
        node: NodeRef<K, V, M>,
        key: K,
        value: V,
        full_run: usize,
        depth: usize,
    ) -> BTreeResult<InsertResult<K, V, M>> {
        let (idx, overwrite) = {
            let n = self.node(node);
            let keys = n.key_slice();
            let idx = keys.partition_point(|probe| probe <= &key);
            (idx, idx > 0 && keys[idx - 1] == key)
        };

        if overwrite {
            // SAFETY: idx - 1 indexes the live prefix; no other reference to
            // this node is live.
            let old = unsafe { node.as_mut().leaf_replace_at(idx - 1, value) };
            return Ok(InsertResult::Updated(Some(old)));
        }

        // Every node in the run splits once the new pair lands; a run
        // spanning the whole path additionally grows a new root.
        let run = if self.node(node).len() == M - 1 {
            full_run + 1
        } else {
            0
        };
        let mut required = run;
        if run == depth + 1 {
            required += 1;
        }
        self.ensure_arena_for(required)?;

        // SAFETY: no other reference to this node is live.
        let n = unsafe { node.as_mut() };
        // SAFETY: idx <= len and len < M (a full leaf split on the insert
        // that filled it).
        unsafe { n.leaf_insert_at(idx, key, value) };
        if n.len() >= M {
            let right = Node::new_leaf_in(self.arena)?;
            // SAFETY: n is full, right is a fresh empty leaf.
            let separator_key = unsafe { n.split_leaf_into(right.as_mut()) };
            return Ok(InsertResult::Split {
                old_value: None,
                separator_key,
                new_right: right,
            });
        }
        Ok(InsertResult::Updated(None))
    }

    /// Verify the arena can supply `nodes` more nodes before mutating.
    fn ensure_arena_for(&self, nodes: usize) -> BTreeResult<()> {
        let required = nodes * Self::NODE_BYTES;
        let remaining = self.arena.remaining();
        if required > remaining {
            return Err(BPlusTreeError::OutOfArena {
                requested: required,
                remaining,
            });
        }
        Ok(())
    }
}
