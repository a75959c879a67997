//! Core types and data structures for the arena-backed B+ tree.
//!
//! This module contains the node layout, the tree container, and the result
//! types shared by the operation modules. Node behavior lives in `node.rs`.

use std::fmt;
use std::mem::{ManuallyDrop, MaybeUninit};
use std::ptr::NonNull;

use crate::arena::Arena;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Minimum fan-out for which the split arithmetic produces non-empty halves.
pub(crate) const MIN_FANOUT: usize = 4;

// ============================================================================
// NODE LAYOUT
// ============================================================================

/// Fixed-capacity key array, aligned so that 256-bit vector loads over any
/// 8-key window are in-bounds: the array's size is padded to a multiple of
/// 32 bytes, and it sits at a 32-byte boundary inside the node.
#[repr(C, align(32))]
pub(crate) struct KeyArray<K, const M: usize>(pub(crate) [MaybeUninit<K>; M]);

/// The `M + 1` child slots of an internal node.
///
/// Stable Rust cannot spell `[T; M + 1]` for a const parameter, so the extra
/// slot is a leading named field. Under `repr(C)` with identical field types
/// the two parts are contiguous and are addressed as one array through the
/// pointer to `head`.
#[repr(C)]
pub(crate) struct ChildSlots<K, V, const M: usize> {
    head: MaybeUninit<NodeRef<K, V, M>>,
    #[allow(dead_code)] // part of the slot array, reached through `base`
    tail: [MaybeUninit<NodeRef<K, V, M>>; M],
}

impl<K, V, const M: usize> ChildSlots<K, V, M> {
    /// Base of the contiguous `M + 1` slot array.
    #[inline]
    pub(crate) fn base(&self) -> *const MaybeUninit<NodeRef<K, V, M>> {
        std::ptr::addr_of!(self.head).cast()
    }

    #[inline]
    pub(crate) fn base_mut(&mut self) -> *mut MaybeUninit<NodeRef<K, V, M>> {
        std::ptr::addr_of_mut!(self.head).cast()
    }
}

/// Overlay of the two node payloads: a leaf's value array and an internal
/// node's child references share the same storage. `Node::is_leaf` is the
/// sole discriminator; reading the wrong side is undefined.
///
/// Neither payload carries drop glue (keys and values are plain-copy data,
/// child references are raw), so the `ManuallyDrop` wrappers demanded by the
/// union never have anything to run.
#[repr(C)]
pub(crate) union Payload<K, V, const M: usize> {
    pub(crate) values: ManuallyDrop<[MaybeUninit<V>; M]>,
    pub(crate) children: ManuallyDrop<ChildSlots<K, V, M>>,
}

/// Fixed-capacity B+ tree node, one arena block.
///
/// The header is followed by the key array and the payload overlay; the
/// whole struct is cache-line aligned so its size is a multiple of 64 and
/// every node starts on a cache line. Key, value, and child slots beyond
/// `num_keys` are uninitialized and must never be read.
#[repr(C, align(64))]
pub(crate) struct Node<K, V, const M: usize> {
    pub(crate) is_leaf: bool,
    pub(crate) num_keys: u16,
    pub(crate) keys: KeyArray<K, M>,
    pub(crate) payload: Payload<K, V, M>,
}

/// Non-owning reference to a node inside the arena.
///
/// Copyable and untracked: validity is guaranteed by the tree's borrow of
/// the arena, not by this handle.
pub(crate) struct NodeRef<K, V, const M: usize>(NonNull<Node<K, V, M>>);

impl<K, V, const M: usize> Clone for NodeRef<K, V, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, const M: usize> Copy for NodeRef<K, V, M> {}

impl<K, V, const M: usize> NodeRef<K, V, M> {
    #[inline]
    pub(crate) fn from_raw(ptr: NonNull<Node<K, V, M>>) -> Self {
        Self(ptr)
    }

    /// Base address of the node, for prefetching.
    #[inline]
    pub(crate) fn as_raw(self) -> *const u8 {
        self.0.as_ptr().cast()
    }

    /// Borrow the node for reading.
    ///
    /// # Safety
    ///
    /// The node must have been allocated from an arena that outlives `'x`,
    /// and no `&mut` to the same node may be live.
    #[inline]
    pub(crate) unsafe fn as_ref<'x>(self) -> &'x Node<K, V, M> {
        self.0.as_ref()
    }

    /// Borrow the node for writing.
    ///
    /// # Safety
    ///
    /// The node must have been allocated from an arena that outlives `'x`,
    /// and no other reference to the same node may be live.
    #[inline]
    pub(crate) unsafe fn as_mut<'x>(mut self) -> &'x mut Node<K, V, M> {
        self.0.as_mut()
    }
}

// ============================================================================
// TREE CONTAINER
// ============================================================================

/// In-memory ordered key→value index: a B+ tree with fixed fan-out `M`,
/// allocated entirely from a bump [`Arena`].
///
/// Three point-lookup strategies with identical observable behavior are
/// exposed: [`find_linear`](Self::find_linear),
/// [`find_binary`](Self::find_binary), and [`find_simd`](Self::find_simd).
/// Keys are plain `Copy + Ord` data, values plain `Copy` data; both are
/// stored inline in the nodes.
///
/// The tree borrows its arena for its whole lifetime; exactly one arena
/// serves a tree, and the arena cannot be reset while the tree exists.
///
/// # Examples
///
/// ```
/// use bptree::{Arena, BPlusTree};
///
/// let arena = Arena::new(BPlusTree::<i32, u64, 64>::arena_capacity_for(256)).unwrap();
/// let mut tree = BPlusTree::<i32, u64, 64>::new(&arena).unwrap();
/// tree.insert(7, 700).unwrap();
/// assert_eq!(tree.find_simd(&7), Some(700));
/// assert_eq!(tree.find_binary(&8), None);
/// ```
pub struct BPlusTree<'arena, K, V, const M: usize = 256> {
    /// Arena every node of this tree lives in.
    pub(crate) arena: &'arena Arena,
    /// Root node; a leaf until the first root split.
    pub(crate) root: NodeRef<K, V, M>,
}

impl<K: Copy + Ord, V: Copy, const M: usize> fmt::Debug for BPlusTree<'_, K, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BPlusTree")
            .field("fanout", &M)
            .field("len", &self.len())
            .field("depth", &self.depth())
            .finish()
    }
}

// ============================================================================
// OPERATION RESULT TYPES
// ============================================================================

/// Result of an insertion at one node, propagated up the recursion.
pub(crate) enum InsertResult<K, V, const M: usize> {
    /// Insertion completed without splitting. Carries the replaced value if
    /// the key already existed.
    Updated(Option<V>),
    /// The node split; the parent must place `new_right` next to it under
    /// `separator_key`.
    Split {
        old_value: Option<V>,
        separator_key: K,
        new_right: NodeRef<K, V, M>,
    },
}
