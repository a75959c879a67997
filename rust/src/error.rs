//! Error handling and result types for arena and tree operations.
//!
//! All three error conditions concern arena storage; they are fatal to the
//! operation that raised them. Lookup misses are reported as `None`, never as
//! errors.

/// Error type for arena and tree operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BPlusTreeError {
    /// The host allocator could not supply the arena's backing buffer.
    AllocationFailed {
        /// Requested buffer size in bytes.
        capacity: usize,
    },
    /// The arena ran out of space while carving out a block.
    OutOfArena {
        /// Bytes the allocation needed, after 64-byte rounding.
        requested: usize,
        /// Bytes the arena still had available.
        remaining: usize,
    },
    /// A tree was constructed over an arena with no usable storage.
    ArenaUnavailable,
}

impl BPlusTreeError {
    /// Check if this error reports a failed buffer acquisition.
    pub fn is_allocation_failed(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }

    /// Check if this error reports arena exhaustion.
    pub fn is_out_of_arena(&self) -> bool {
        matches!(self, Self::OutOfArena { .. })
    }

    /// Check if this error reports a missing or empty arena.
    pub fn is_arena_unavailable(&self) -> bool {
        matches!(self, Self::ArenaUnavailable)
    }
}

impl std::fmt::Display for BPlusTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BPlusTreeError::AllocationFailed { capacity } => {
                write!(f, "failed to acquire {} byte arena buffer", capacity)
            }
            BPlusTreeError::OutOfArena {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "arena exhausted: {} bytes requested, {} bytes remaining",
                    requested, remaining
                )
            }
            BPlusTreeError::ArenaUnavailable => {
                write!(f, "no usable arena for node allocation")
            }
        }
    }
}

impl std::error::Error for BPlusTreeError {}

/// Public result type for tree operations that may fail.
pub type BTreeResult<T> = Result<T, BPlusTreeError>;

/// Result type for arena and tree construction.
pub type InitResult<T> = Result<T, BPlusTreeError>;
