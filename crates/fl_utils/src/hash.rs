//! Hash states and hash containers.
//!
//! [`FixedHashState`] gives the same result for the same input in every run,
//! which keeps container behaviour reproducible between processes.
//!
//! [`NoOpHashState`] passes a single `u64` straight through. It is only
//! suitable for keys that are already well distributed, such as `TypeId`
//! or pointer identities.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

// -----------------------------------------------------------------------------
// FixedHashState

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6A09E667F3BCC909);

/// Hasher produced by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// `foldhash` with a fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use fl_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("email");
/// let b = FixedHashState.hash_one("email");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHashState

/// Hasher produced by [`NoOpHashState`].
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        // `write_u32(10)` and `write_u64(10)` must agree.
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.hash = i as u64;
    }
}

/// Uses the written integer as the hash value.
///
/// ```
/// use core::hash::BuildHasher;
/// use fl_utils::hash::NoOpHashState;
///
/// assert_eq!(NoOpHashState.hash_one(42_usize), 42);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

// -----------------------------------------------------------------------------
// Containers

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`] by default.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{FixedHashState, HashSet, NoOpHashState};
    use core::hash::BuildHasher;

    #[test]
    fn noop_integer_widths_agree() {
        assert_eq!(NoOpHashState.hash_one(7_u32), NoOpHashState.hash_one(7_u64));
        assert_eq!(NoOpHashState.hash_one(7_usize), 7);
    }

    #[test]
    fn fixed_state_is_stable() {
        assert_eq!(FixedHashState.hash_one(1234), FixedHashState.hash_one(1234));
    }

    #[test]
    fn set_with_noop_state() {
        let mut set: HashSet<usize, NoOpHashState> = HashSet::with_hasher(NoOpHashState);
        assert!(set.insert(0x1000));
        assert!(!set.insert(0x1000));
        assert!(set.remove(&0x1000));
        assert!(set.is_empty());
    }
}
