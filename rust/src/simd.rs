//! Vectorized in-node key probes.
//!
//! [`SimdKey`] is the dispatch seam for the SIMD find variant: `i32` keys
//! get 8-lane AVX2 kernels (one packed comparison per 8 keys, bitmask
//! extraction, T0 prefetch of the following window); every other integer
//! width falls back to the binary probes, as does `i32` on hosts without
//! AVX2. Key types outside this set do not implement the trait and do not
//! expose the variant.

use std::slice;

/// In-node probe strategies for a key type, as used by the SIMD find
/// variant.
///
/// Both probes operate on the raw key array of a node rather than a slice:
/// the vector kernels read whole 8-lane chunks, so they may touch storage
/// past the live prefix. Lanes at or past `len` hold indeterminate data and
/// are never trusted.
pub trait SimdKey: Copy + Ord {
    /// First index in `keys[..len]` holding a key strictly greater than
    /// `key`, or `len` if there is none. At an internal node this is the
    /// descent child index.
    ///
    /// # Safety
    ///
    /// `keys` must point to a node key array with at least `len` initialized
    /// entries, backed by storage readable through the final 32-byte chunk
    /// covering `len` entries.
    unsafe fn descend_index(keys: *const Self, len: usize, key: &Self) -> usize;

    /// Index of the entry in `keys[..len]` equal to `key`, if present.
    ///
    /// # Safety
    ///
    /// Same contract as [`descend_index`](Self::descend_index).
    unsafe fn locate(keys: *const Self, len: usize, key: &Self) -> Option<usize>;
}

#[inline]
unsafe fn binary_descend_index<K: Ord>(keys: *const K, len: usize, key: &K) -> usize {
    slice::from_raw_parts(keys, len).partition_point(|probe| probe <= key)
}

#[inline]
unsafe fn binary_locate<K: Ord>(keys: *const K, len: usize, key: &K) -> Option<usize> {
    slice::from_raw_parts(keys, len).binary_search(key).ok()
}

macro_rules! binary_fallback_simd_key {
    ($($t:ty),+ $(,)?) => {$(
        impl SimdKey for $t {
            #[inline]
            unsafe fn descend_index(keys: *const Self, len: usize, key: &Self) -> usize {
                binary_descend_index(keys, len, key)
            }

            #[inline]
            unsafe fn locate(keys: *const Self, len: usize, key: &Self) -> Option<usize> {
                binary_locate(keys, len, key)
            }
        }
    )+};
}

// No packed comparison kernel for these widths; the binary probe already
// beats a widening emulation.
binary_fallback_simd_key!(i8, i16, i64, i128, u8, u16, u32, u64, u128, isize, usize);

impl SimdKey for i32 {
    #[inline]
    unsafe fn descend_index(keys: *const Self, len: usize, key: &Self) -> usize {
        #[cfg(target_arch = "x86_64")]
        {
            if std::arch::is_x86_feature_detected!("avx2") {
                return avx2::descend_index(keys, len, *key);
            }
        }
        binary_descend_index(keys, len, key)
    }

    #[inline]
    unsafe fn locate(keys: *const Self, len: usize, key: &Self) -> Option<usize> {
        #[cfg(target_arch = "x86_64")]
        {
            if std::arch::is_x86_feature_detected!("avx2") {
                return avx2::locate(keys, len, *key);
            }
        }
        binary_locate(keys, len, key)
    }
}

/// Hint the prefetcher at the first two cache lines of a node before
/// descending into it. Purely advisory; correctness never depends on it.
#[inline(always)]
pub(crate) fn prefetch_node(node: *const u8) {
    #[cfg(target_arch = "x86_64")]
    // SAFETY: prefetch is a hint and never faults, even on bad addresses.
    unsafe {
        use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};
        _mm_prefetch::<_MM_HINT_T0>(node.cast());
        _mm_prefetch::<_MM_HINT_T0>(node.add(64).cast());
    }
    #[cfg(not(target_arch = "x86_64"))]
    let _ = node;
}

#[cfg(target_arch = "x86_64")]
mod avx2 {
    use std::arch::x86_64::{
        __m256i, _mm256_castsi256_ps, _mm256_cmpeq_epi32, _mm256_cmpgt_epi32, _mm256_loadu_si256,
        _mm256_movemask_ps, _mm256_set1_epi32, _mm_prefetch, _MM_HINT_T0,
    };

    const LANES: usize = 8;

    /// 8-lane greater-than scan: the lowest set mask bit marks the first key
    /// above `key`.
    ///
    /// # Safety
    ///
    /// Caller upholds the [`SimdKey`](super::SimdKey) storage contract and
    /// has verified AVX2 support.
    #[target_feature(enable = "avx2")]
    pub(super) unsafe fn descend_index(keys: *const i32, len: usize, key: i32) -> usize {
        let needle = _mm256_set1_epi32(key);
        let mut base = 0;
        while base < len {
            _mm_prefetch::<_MM_HINT_T0>(keys.add(base + LANES).cast());
            let chunk = _mm256_loadu_si256(keys.add(base) as *const __m256i);
            let gt = _mm256_cmpgt_epi32(chunk, needle);
            let mask = _mm256_movemask_ps(_mm256_castsi256_ps(gt)) as u32;
            if mask != 0 {
                let idx = base + mask.trailing_zeros() as usize;
                // A hit on a stale lane at or past `len` means every live
                // key in the node is <= `key`.
                return if idx < len { idx } else { len };
            }
            base += LANES;
        }
        len
    }

    /// 8-lane equality scan over a leaf's keys.
    ///
    /// # Safety
    ///
    /// Caller upholds the [`SimdKey`](super::SimdKey) storage contract and
    /// has verified AVX2 support.
    #[target_feature(enable = "avx2")]
    pub(super) unsafe fn locate(keys: *const i32, len: usize, key: i32) -> Option<usize> {
        let needle = _mm256_set1_epi32(key);
        let mut base = 0;
        while base < len {
            _mm_prefetch::<_MM_HINT_T0>(keys.add(base + LANES).cast());
            let chunk = _mm256_loadu_si256(keys.add(base) as *const __m256i);
            let eq = _mm256_cmpeq_epi32(chunk, needle);
            let mask = _mm256_movemask_ps(_mm256_castsi256_ps(eq)) as u32;
            if mask != 0 {
                let idx = base + mask.trailing_zeros() as usize;
                // Keys are distinct and sorted: a lowest hit on a stale tail
                // lane means the live prefix holds no match.
                if idx < len {
                    return Some(idx);
                }
            }
            base += LANES;
        }
        None
    }
}
