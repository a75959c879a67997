//! In-memory ordered key→value index: a fixed-fan-out B+ tree over a bump
//! arena, with three interchangeable point-lookup strategies.
//!
//! All nodes are fixed-capacity, cache-line-aligned blocks carved from a
//! single [`Arena`]; leaves and internal nodes share one footprint by
//! overlaying the value and child arrays. Lookups come in linear, binary,
//! and SIMD flavors with identical observable behavior; the SIMD variant
//! probes 8 keys per packed comparison on AVX2 hosts and prefetches child
//! nodes during descent.
//!
//! Insertion keeps the tree balanced through recursive split propagation;
//! removal is a best-effort leaf erase that never rebalances. The arena
//! reclaims nothing until it is reset or dropped, which also bounds every
//! node's lifetime.
//!
//! ```
//! use bptree::{Arena, BPlusTree};
//!
//! let arena = Arena::new(BPlusTree::<i32, u64, 64>::arena_capacity_for(256)).unwrap();
//! let mut tree = BPlusTree::<i32, u64, 64>::new(&arena).unwrap();
//! for k in 0..1000 {
//!     tree.insert(k, (k as u64) * 3).unwrap();
//! }
//! assert_eq!(tree.find_linear(&500), Some(1500));
//! assert_eq!(tree.find_binary(&500), Some(1500));
//! assert_eq!(tree.find_simd(&500), Some(1500));
//! assert_eq!(tree.find_simd(&1001), None);
//! ```

mod arena;
mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod node;
mod simd;
mod tree_structure;
mod types;
mod validation;

pub use arena::{Arena, ArenaStats};
pub use error::{BPlusTreeError, BTreeResult, InitResult};
pub use simd::SimdKey;
pub use types::BPlusTree;
